use crate::buffer::{EventBuffer, RECORD_SIZE};
use crate::control::ControlChannel;
use loom::sync::Arc;
use loom::thread;
use std::vec::Vec;

#[test]
fn drain_never_observes_unwritten_record() {
    loom::model(|| {
        let buffer = Arc::new(EventBuffer::with_capacity(4 * RECORD_SIZE).unwrap());

        let producer_buffer = buffer.clone();
        let producer = thread::spawn(move || {
            let producer = producer_buffer.producer();
            producer.push(1);
            producer.push(2);
        });

        let mut seen = Vec::new();
        if let Some(drain) = buffer.consumer().drain_latest() {
            assert!(drain.latest == 1 || drain.latest == 2);
            assert!(buffer.tail() < buffer.capacity());
            seen.push(drain.latest);
        }

        producer.join().unwrap();

        while let Some(drain) = buffer.consumer().drain_latest() {
            seen.push(drain.latest);
        }
        assert_eq!(seen.last(), Some(&2));
        assert!(buffer.is_empty());
    });
}

#[test]
fn head_and_tail_stay_in_range_across_wrap() {
    loom::model(|| {
        let buffer = Arc::new(EventBuffer::with_capacity(2 * RECORD_SIZE).unwrap());

        let producer_buffer = buffer.clone();
        let producer = thread::spawn(move || {
            let producer = producer_buffer.producer();
            for v in 1..=3 {
                producer.push(v);
            }
        });

        let mut consumer = buffer.consumer();
        for _ in 0..2 {
            if let Some(drain) = consumer.drain_latest() {
                assert!((1..=3).contains(&drain.latest));
                assert!(drain.advanced <= buffer.capacity());
            }
            assert!(buffer.tail() < buffer.capacity());
            assert!(buffer.head() < buffer.capacity());
        }

        producer.join().unwrap();
    });
}

#[test]
fn message_write_is_never_torn() {
    loom::model(|| {
        let control = Arc::new(ControlChannel::new(0, b"aaaa"));

        let writer_control = control.clone();
        let writer = thread::spawn(move || {
            writer_control.write(b"bbbbbb".as_slice(), 6).unwrap();
        });

        let seen = control.message();
        assert!(seen.as_bytes() == b"aaaa" || seen.as_bytes() == b"bbbbbb");

        writer.join().unwrap();
        assert_eq!(control.message().as_bytes(), b"bbbbbb");
    });
}
