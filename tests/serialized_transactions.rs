use std::sync::Arc;
use std::thread;
use std::time::Duration;

use relay_bridge_lib::serial::mock::LinkEvent;
use relay_bridge_lib::serial::{MockLink, SerialInterface};
use relay_bridge_lib::switch::{Command, SwitchController};

#[test]
fn concurrent_applies_never_interleave_on_the_wire() {
    let link = MockLink::echo().with_latency(Duration::from_millis(5));
    let controller = Arc::new(SwitchController::new(SerialInterface::from_link(
        "mock",
        Box::new(link.clone()),
    )));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let controller = controller.clone();
            thread::spawn(move || {
                let command = if i % 2 == 0 { Command::On } else { Command::Off };
                let outcome = controller.apply(command).expect("transaction failed");
                // Echo device: interleaving would hand us another caller's byte.
                assert_eq!(outcome.acknowledgment, vec![command.byte()]);
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let events = link.events();
    assert_eq!(events.len(), 16);
    for pair in events.chunks(2) {
        match pair {
            [LinkEvent::Write(bytes), LinkEvent::Read { returned: 1, .. }] => {
                assert_eq!(bytes.len(), 1)
            }
            other => panic!("write/read pair broken: {other:?}"),
        }
    }
}
