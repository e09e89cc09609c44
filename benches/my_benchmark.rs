use anyhow::Result;
use futures::channel::mpsc;
use futures::io;
use futures::prelude::*;
use futures::try_join;
use incremental_text_decoder::{DecodeStream, TextDecoder};

use criterion::async_executor::FuturesExecutor;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

async fn decode_hearts_one_by_one(n: usize, hearts: &[u8]) -> Result<()> {
    let (mut tx, rx) = mpsc::unbounded::<io::Result<Vec<u8>>>();
    let mut decoder = DecodeStream::new(rx.into_async_read());

    let producer = async {
        for _ in 1..n {
            for b in hearts {
                tx.send(Ok(vec![*b])).await?;
            }
        }
        drop(tx);
        Ok(()) as Result<()>
    };
    let consumer = async {
        while let Some(Ok(_)) = decoder.next().await {
            // Do NOTHING
        }
        Ok(()) as Result<()>
    };

    try_join!(producer, consumer)?;

    Ok(())
}

fn decode_hearts_sync(n: usize, hearts: &[u8]) {
    let mut decoder = TextDecoder::new();
    for _ in 1..n {
        for chunk in hearts.chunks(3) {
            let _ = decoder.decode_stream(chunk);
        }
    }
    let _ = decoder.finish();
}

fn criterion_benchmark(c: &mut Criterion) {
    let hearts = include_bytes!("./hearts.txt");
    c.bench_function("decode stream x10", |b| {
        b.to_async(FuturesExecutor)
            .iter(|| decode_hearts_one_by_one(black_box(10), hearts))
    });
    c.bench_function("decode chunked x10", |b| {
        b.iter(|| decode_hearts_sync(black_box(10), hearts))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
