use fdready::application::config::loader::ConfigLoader;
use fdready::application::config::models::Config;
use fdready::core::event::event_loop::EventLoop;
use fdready::core::net::fd::FileDescriptor;
use fdready::mux::{Delivery, Interest, Operation, Owner, Session};
use std::env;

const STDIN: i32 = 0;
const WATCHER: Owner = Owner(1);

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => match ConfigLoader::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config file: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    ConfigLoader::apply_logging(&config);

    let session = match Session::start_with(&config, Vec::<Delivery>::new()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error starting session: {}", e);
            std::process::exit(1);
        }
    };

    let mut event_loop = EventLoop::new(session, config.poll_timeout_ms);
    if let Err(e) = watch_stdin(&mut event_loop) {
        eprintln!("Watch error: {}", e);
        event_loop.stop();
        std::process::exit(1);
    }
    event_loop.stop();
}

/// Print a notification for every readable firing on stdin, rearming each time, until EOF.
fn watch_stdin(event_loop: &mut EventLoop<Vec<Delivery>>) -> fdready::Result<()> {
    let stdin = FileDescriptor::new(STDIN);
    let mut buf = [0u8; 4096];

    event_loop
        .session_mut()
        .apply(STDIN, Interest::READABLE, Operation::Set, WATCHER)?;

    loop {
        event_loop.run_once()?;

        let deliveries: Vec<Delivery> = event_loop.session_mut().sink_mut().drain(..).collect();
        for delivery in deliveries {
            println!("{} -> {}", delivery.owner, delivery.notification);

            let n = stdin.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }

            event_loop
                .session_mut()
                .apply(STDIN, Interest::READABLE, Operation::Set, WATCHER)?;
        }
    }
}
