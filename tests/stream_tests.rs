use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use judge_board::stream::{
    pipe, pipe_with_chunk_size, BlockingByteQueue, ChunkedByteBuffer, StreamState,
};
use judge_board::BoardError;

#[derive(Debug, Clone)]
enum Op {
    Push(Vec<u8>),
    Pop(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..100).prop_map(Op::Push),
        (0usize..120).prop_map(Op::Pop),
    ]
}

proptest! {
    #[test]
    fn buffer_behaves_like_a_byte_fifo(
        chunk_size in 1usize..48,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut buffer = ChunkedByteBuffer::with_chunk_size(chunk_size).unwrap();
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(bytes) => {
                    buffer.push(&bytes);
                    model.extend(bytes);
                }
                Op::Pop(n) => {
                    let mut out = vec![0u8; n];
                    let popped = buffer.pop(&mut out);
                    let expected: Vec<u8> = model.drain(..n.min(model.len())).collect();
                    prop_assert_eq!(&out[..popped], &expected[..]);
                }
            }
            prop_assert_eq!(buffer.size(), model.len());
        }
    }
}

#[test]
fn thousand_bytes_through_small_chunks() {
    let mut buffer = ChunkedByteBuffer::new();
    let input: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
    buffer.push(&input);
    assert_eq!(buffer.size(), 1000);

    let mut out = vec![0u8; 2000];
    assert_eq!(buffer.pop(&mut out), 1000);
    assert_eq!(&out[..1000], &input[..]);
    assert!(buffer.is_empty());
}

#[test]
fn queue_pop_blocks_until_data_arrives() {
    let queue = Arc::new(BlockingByteQueue::new(ChunkedByteBuffer::new()));

    let reader = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut out = [0u8; 8];
            let n = queue.pop(&mut out).unwrap();
            out[..n].to_vec()
        })
    };

    thread::sleep(Duration::from_millis(50));
    queue.push(b"ping").unwrap();
    assert_eq!(reader.join().unwrap(), b"ping");
}

#[test]
fn queue_dispose_wakes_every_waiter() {
    let queue = Arc::new(BlockingByteQueue::new(ChunkedByteBuffer::new()));

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut out = [0u8; 4];
                queue.pop(&mut out)
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    queue.dispose();

    for waiter in waiters {
        assert!(matches!(waiter.join().unwrap(), Err(BoardError::Disposed)));
    }
    assert!(matches!(queue.push(b"late"), Err(BoardError::Disposed)));
}

#[test]
fn ten_bytes_then_close_reads_to_end() {
    let (mut producer, mut consumer) = pipe();
    producer.write_all(b"0123456789").unwrap();
    producer.close();

    let mut out = [0u8; 4];
    assert_eq!(consumer.read(&mut out).unwrap(), 4);
    assert_eq!(&out, b"0123");

    let mut rest = Vec::new();
    consumer.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"456789");

    assert_eq!(consumer.read(&mut out).unwrap(), 0);
    assert_eq!(consumer.state(), StreamState::EndOfStream);
}

#[test]
fn pipe_carries_bytes_across_threads_in_order() {
    let (mut producer, mut consumer) = pipe_with_chunk_size(7).unwrap();
    let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 256) as u8).collect();

    let writer = {
        let payload = payload.clone();
        thread::spawn(move || {
            for piece in payload.chunks(333) {
                producer.write_all(piece).unwrap();
            }
            // Dropping the producer ends the stream.
        })
    };

    let mut received = Vec::new();
    consumer.read_to_end(&mut received).unwrap();
    writer.join().unwrap();

    assert_eq!(received, payload);
}

#[test]
fn write_after_close_is_broken_pipe() {
    let (mut producer, _consumer) = pipe();
    producer.close();

    let err = producer.write(b"x").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
}

#[test]
fn closed_consumer_rejects_reads() {
    let (mut producer, mut consumer) = pipe();
    producer.write_all(b"abc").unwrap();
    consumer.close();

    let mut out = [0u8; 3];
    assert!(matches!(consumer.recv(&mut out), Err(BoardError::Disposed)));
}
