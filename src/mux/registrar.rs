use crate::common::error::{MuxError, Result};
use crate::common::logger::Logger;
use crate::core::event::backend::{ArmSemantics, ReadinessBackend};
use crate::core::event::event::Interest;
use crate::mux::request::{Operation, Request};
use crate::mux::table::{DescriptorEntry, DescriptorTable};

/// Validates register/clear requests and applies them to the backend and table.
pub struct Registrar;

impl Registrar {
    /// Apply one request. Validation runs before any mutation, so a rejected
    /// request leaves both the table and the backend untouched.
    pub fn apply<B: ReadinessBackend + ?Sized>(
        table: &mut DescriptorTable,
        backend: &mut B,
        request: &Request,
    ) -> Result<()> {
        let fd = request.fd;

        if !table.contains(fd) || !backend.is_open(fd) {
            Logger::debug(&format!("Rejected {:?}: descriptor {} not valid", request.operation, fd));
            return Err(MuxError::InvalidDescriptor(fd));
        }

        match request.operation {
            Operation::Set => {
                // An accumulating backend would OR the new mask into a stale one.
                if backend.arm_semantics() == ArmSemantics::Accumulate {
                    backend.disarm(fd, Interest::all())?;
                }

                if let Err(e) = backend.arm(fd, request.mask) {
                    table.get_mut(fd).interest = Interest::empty();
                    return Err(e);
                }

                table.set(
                    fd,
                    DescriptorEntry {
                        interest: request.mask,
                        owner: Some(request.requester),
                    },
                );
            }
            Operation::Clear => {
                backend.disarm(fd, request.mask)?;
                table.get_mut(fd).interest -= request.mask;
            }
            Operation::Unknown(selector) => {
                Logger::debug(&format!("Rejected unknown selector {} for fd {}", selector, fd));
                return Err(MuxError::InvalidOperation(selector));
            }
        }

        Ok(())
    }
}
