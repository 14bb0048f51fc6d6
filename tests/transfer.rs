mod common;

use std::sync::Arc;
use std::thread;

use saa716x::i2c::{AdapterManager, Error, Message, NoRegistry};
use saa716x::Config;

use common::*;

type Manager = AdapterManager<Arc<SimChip>, Arc<SimChip>>;

fn attach(chip: &Arc<SimChip>, config: Config) -> Manager {
    init_logger();

    let manager = AdapterManager::attach(chip.clone(), chip.clone(), config, &mut NoRegistry)
        .expect("attach");
    chip.clear_events();
    manager
}

#[test]
fn write_then_read_returns_primed_bytes() {
    let chip = SimChip::new();
    chip.add_device(0, 0x60, &[0xde, 0xad]);
    let manager = attach(&chip, Config::new());

    let mut buffer = [0x55u8; 2];
    let count = manager
        .transfer(
            0,
            &mut [
                Message::write(0x60, &[0x04]),
                Message::read(0x60, &mut buffer),
            ],
        )
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(buffer, [0xde, 0xad]);
    assert_eq!(chip.written(0, 0x60), vec![0x04]);

    // One START per message, a single STOP on the final filler byte
    assert_eq!(
        chip.writes_to(BUS0 + FIFO),
        vec![START | 0xc0, 0x04, START | 0xc1, 0x00, STOP]
    );
}

#[test]
fn batch_clears_interrupt_status_first() {
    let chip = SimChip::new();
    chip.add_device(1, 0x10, &[]);
    let manager = attach(&chip, Config::new());

    manager
        .transfer(1, &mut [Message::write(0x10, &[0x01, 0x02])])
        .unwrap();

    let first = chip.events().into_iter().next().unwrap();
    assert_eq!(first.offset(), Some(BUS1 + INT_CLR_STATUS));
    assert_eq!(chip.written(1, 0x10), vec![0x01, 0x02]);
}

#[test]
fn nack_stops_batch_without_recovery() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    chip.add_device(0, 0x51, &[]);
    let manager = attach(&chip, Config::new());

    let mut buffer = [0u8; 2];
    let mut messages = [
        Message::write(0x50, &[0x01, 0x02]),
        Message::read(0x60, &mut buffer),
        Message::write(0x51, &[0x03]),
    ];
    let (completed, result) = manager.transfer_partial(0, &mut messages);

    assert_eq!(completed, 1);
    assert!(matches!(result, Err(Error::DeviceNotResponding)));
    assert_eq!(chip.written(0, 0x50), vec![0x01, 0x02]);
    assert!(chip.written(0, 0x51).is_empty());

    // The only control write is the transmit FIFO flush after the NACK
    assert_eq!(chip.writes_to(BUS0 + CONTROL), vec![0xc1]);

    // The bus lock has been released
    chip.clear_events();
    assert_eq!(
        manager
            .transfer(0, &mut [Message::write(0x51, &[0x04])])
            .unwrap(),
        1
    );
}

#[test]
fn read_settles_for_queued_bytes() {
    let chip = SimChip::new();
    chip.add_device(0, 0x60, &[0x12]);
    let manager = attach(&chip, Config::new().i2c_rate(100_000));
    chip.set_tx_levels(0, &[1]);

    let mut buffer = [0u8; 1];
    manager
        .transfer(0, &mut [Message::read(0x60, &mut buffer)])
        .unwrap();

    // One queued byte plus the one being addressed, then the fixed margin
    let events = chip.events();
    assert_eq!(events[0], Event::write(BUS0 + INT_CLR_STATUS, 0x1fff));
    assert_eq!(events[1], Event::sleep(280, 300));
    assert_eq!(events[2], Event::write(BUS0 + FIFO, START | 0xc1));
    assert_eq!(buffer, [0x12]);
}

#[test]
fn write_completion_backs_off_by_queue_depth() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    let manager = attach(&chip, Config::new().i2c_rate(400_000));
    chip.set_tx_levels(0, &[3, 1]);

    manager
        .transfer(0, &mut [Message::write(0x50, &[0x01, 0x02])])
        .unwrap();

    let events = chip.events();
    let last_queued = events
        .iter()
        .rposition(|event| event.offset() == Some(BUS0 + FIFO))
        .unwrap();

    assert_eq!(
        events[last_queued + 1..].to_vec(),
        vec![Event::sleep(69, 92), Event::sleep(23, 46)]
    );
}

#[test]
fn interrupted_read_leaves_missing_bytes_zeroed() {
    let chip = SimChip::new();
    chip.add_device(0, 0x60, &[0x5a, 0x5b, 0x5c]);
    let manager = attach(&chip, Config::new());
    chip.set_rx_limit(0, 1);

    let mut buffer = [0xaau8; 3];
    let (completed, result) =
        manager.transfer_partial(0, &mut [Message::read(0x60, &mut buffer)]);

    assert_eq!(completed, 0);
    assert!(matches!(result, Err(Error::Timeout)));

    // Stale contents are cleared before the first byte is received, so the
    // bytes the device never sent read back as zero
    assert_eq!(buffer, [0x5a, 0x00, 0x00]);
}

#[test]
fn nack_is_returned_unchanged() {
    let chip = SimChip::new();
    let manager = attach(&chip, Config::new());

    match manager.transfer(0, &mut [Message::write(0x42, &[0x00])]) {
        Err(e) => assert!(e.is_nack()),
        Ok(count) => panic!("unexpected success: {}", count),
    }
}

#[test]
fn bus_error_resets_then_recovers() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    chip.bus_error_on_start(0, 1);
    let manager = attach(&chip, Config::new());

    let result = manager.transfer(0, &mut [Message::write(0x50, &[0xaa])]);
    assert!(matches!(result, Err(Error::BusError)));

    let events = chip.events();
    let last_queued = events
        .iter()
        .rposition(|event| event.offset() == Some(BUS0 + FIFO))
        .unwrap();
    let tail: Vec<_> = events[last_queued + 1..].to_vec();

    let recovery = [
        0xc0, 0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0,
        0x40, 0xc0, 0x40, 0xc0, 0x40, 0x00, 0x80, 0xc0,
    ];
    let mut expected = vec![
        Event::write(BUS0 + CONTROL, 0xc1),
        Event::sleep(300, 400),
    ];
    for &step in recovery.iter() {
        expected.push(Event::write(BUS0 + CONTROL, step));
        expected.push(Event::sleep(100, 120));
    }

    assert_eq!(tail, expected);
}

#[test]
fn busy_controller_times_out_and_recovers() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    let manager = attach(&chip, Config::new().i2c_rate(400_000));
    chip.set_busy(0, true);

    let result = manager.transfer(0, &mut [Message::write(0x50, &[0xaa])]);
    assert!(matches!(result, Err(Error::Timeout)));

    let events = chip.events();
    let polls = events
        .iter()
        .filter(|event| **event == Event::sleep(92, 138))
        .count();
    assert_eq!(polls, 20);
    assert!(chip.writes_to(BUS0 + FIFO).is_empty());
    assert_eq!(chip.writes_to(BUS0 + CONTROL).len(), 24);
}

#[test]
fn oversized_read_rejects_batch_before_bus_activity() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    let manager = attach(&chip, Config::new());

    let mut buffer = [0u8; 9];
    let result = manager.transfer(
        0,
        &mut [
            Message::write(0x50, &[0x01]),
            Message::read(0x50, &mut buffer),
        ],
    );

    assert!(matches!(result, Err(Error::ReadTooLong(9))));
    assert!(chip.events().is_empty());
    assert!(chip.written(0, 0x50).is_empty());
}

#[test]
fn empty_batch_completes_without_bus_activity() {
    let chip = SimChip::new();
    let manager = attach(&chip, Config::new());

    assert_eq!(manager.transfer(0, &mut []).unwrap(), 0);
    assert!(chip.events().is_empty());
}

#[test]
fn invalid_bus_is_rejected() {
    let chip = SimChip::new();
    let manager = attach(&chip, Config::new());

    assert!(matches!(
        manager.transfer(2, &mut [Message::write(0x50, &[])]),
        Err(Error::InvalidBus(2))
    ));
    assert!(manager.bus(2).is_err());
}

#[test]
fn bus_handle_write_read() {
    let chip = SimChip::new();
    chip.add_device(1, 0x1c, &[0x7f]);
    let manager = attach(&chip, Config::new());
    let bus = manager.bus(1).unwrap();

    let mut value = [0u8; 1];
    bus.write_read(0x1c, &[0x00], &mut value).unwrap();

    assert_eq!(bus.index(), 1);
    assert_eq!(value, [0x7f]);
    assert_eq!(chip.written(1, 0x1c), vec![0x00]);
}

#[test]
fn same_bus_batches_never_interleave() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    let manager = attach(&chip, Config::new());

    thread::scope(|s| {
        for t in 0..4u8 {
            let manager = &manager;
            s.spawn(move || {
                for i in 0..25u8 {
                    manager
                        .transfer(
                            0,
                            &mut [
                                Message::write(0x50, &[t, i]),
                                Message::write(0x50, &[t, i, 0xff]),
                            ],
                        )
                        .unwrap();
                }
            });
        }
    });

    // Every batch starts by clearing the interrupt status, and ends with the
    // STOP word. Nothing in between may come from another thread.
    let mut owner = None;
    let mut batches = 0;
    for event in chip.events() {
        let (thread, offset, value) = match event {
            Event::Write {
                thread,
                offset,
                value,
            } if offset & !0xfff == BUS0 => (thread, offset, value),
            _ => continue,
        };

        if offset == BUS0 + INT_CLR_STATUS {
            assert_eq!(owner, None, "batch started while another was in progress");
            owner = Some(thread);
            continue;
        }

        assert_eq!(owner, Some(thread), "interleaved register access");

        if offset == BUS0 + FIFO && value & STOP != 0 {
            owner = None;
            batches += 1;
        }
    }

    assert_eq!(batches, 100);
    assert_eq!(chip.written(0, 0x50).len(), 100 * 5);
}

#[test]
fn different_buses_operate_independently() {
    let chip = SimChip::new();
    chip.add_device(0, 0x50, &[]);
    chip.add_device(1, 0x50, &[]);
    let manager = attach(&chip, Config::new());

    thread::scope(|s| {
        for bus in 0..2usize {
            let manager = &manager;
            s.spawn(move || {
                for i in 0..50u8 {
                    manager
                        .transfer(bus, &mut [Message::write(0x50, &[i])])
                        .unwrap();
                }
            });
        }
    });

    let expected: Vec<u8> = (0..50).collect();
    assert_eq!(chip.written(0, 0x50), expected);
    assert_eq!(chip.written(1, 0x50), expected);
}
