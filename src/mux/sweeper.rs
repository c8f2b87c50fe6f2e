use crate::common::logger::Logger;
use crate::core::event::backend::ReadinessBackend;
use crate::mux::table::{DescriptorEntry, DescriptorTable};

/// Releases every registration still armed when a session stops.
pub struct Sweeper;

impl Sweeper {
    /// Disarm each armed descriptor's full mask and reset its entry.
    /// Failures are logged and skipped. Returns how many entries were armed.
    pub fn sweep<B: ReadinessBackend + ?Sized>(table: &mut DescriptorTable, backend: &mut B) -> usize {
        let armed: Vec<_> = table.armed().collect();

        for (fd, entry) in &armed {
            if let Err(e) = backend.disarm(*fd, entry.interest) {
                Logger::debug(&format!("Teardown disarm failed for fd {}: {}", fd, e));
            }
            table.set(*fd, DescriptorEntry::default());
        }

        armed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::event::Interest;
    use crate::mux::notify::Owner;
    use crate::mux::testing::{Call, RecordingBackend};

    fn entry(interest: Interest) -> DescriptorEntry {
        DescriptorEntry {
            interest,
            owner: Some(Owner(1)),
        }
    }

    #[test]
    fn test_sweep_disarms_full_masks() {
        let mut table = DescriptorTable::new(8).unwrap();
        let mut backend = RecordingBackend::with_open(&[]);
        table.set(1, entry(Interest::READABLE));
        table.set(4, entry(Interest::all()));

        assert_eq!(Sweeper::sweep(&mut table, &mut backend), 2);
        assert_eq!(
            backend.calls,
            vec![Call::Disarm(1, Interest::READABLE), Call::Disarm(4, Interest::all())]
        );
        assert_eq!(table.armed_count(), 0);
    }

    #[test]
    fn test_sweep_continues_past_failures() {
        let mut table = DescriptorTable::new(8).unwrap();
        let mut backend = RecordingBackend::with_open(&[]);
        backend.fail_disarm = true;
        table.set(2, entry(Interest::WRITABLE));
        table.set(3, entry(Interest::READABLE));

        assert_eq!(Sweeper::sweep(&mut table, &mut backend), 2);
        assert_eq!(backend.calls.len(), 2);
    }

    #[test]
    fn test_sweep_skips_unarmed_entries() {
        let mut table = DescriptorTable::new(8).unwrap();
        let mut backend = RecordingBackend::with_open(&[]);
        table.get_mut(5).owner = Some(Owner(3));

        assert_eq!(Sweeper::sweep(&mut table, &mut backend), 0);
        assert!(backend.calls.is_empty());
    }
}
