//! Performance benchmarks for the card sector codec.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench codec_bench
//! ```

use chrono::TimeDelta;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use parkcard_core::{CardUid, ClientType, constants::SECTOR_SIZE};
use parkcard_protocol::{CardRecord, card_epoch, decode_sector, encode_sector};
use std::hint::black_box;

/// Create a record with every on-card field populated.
fn create_record() -> CardRecord {
    let base = card_epoch() + TimeDelta::days(9000);
    let mut record = CardRecord::new(CardUid::new([0xAB, 0xCD, 0x65, 0xE8]));
    record.parking_enter_time = base;
    record.last_recount_time = base - TimeDelta::hours(2);
    record.last_payment_time = base - TimeDelta::days(3);
    record.null_time_1 = base - TimeDelta::days(7);
    record.tvp = base - TimeDelta::hours(30);
    record.date_save_card = base;
    record.sum_on_card = 15_000;
    record.zone_id = 2;
    record.tkvp = 3;
    record.set_client_type(ClientType::Subscription);
    record
}

fn bench_encode(c: &mut Criterion) {
    let record = create_record();
    let mut group = c.benchmark_group("encode_sector");
    group.throughput(Throughput::Bytes(SECTOR_SIZE as u64));

    group.bench_function("full_record", |b| {
        b.iter(|| encode_sector(black_box(&record)).unwrap())
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let record = create_record();
    let sector = encode_sector(&record).unwrap();
    let uid = record.uid();
    let mut group = c.benchmark_group("decode_sector");
    group.throughput(Throughput::Bytes(SECTOR_SIZE as u64));

    group.bench_function("full_record", |b| {
        b.iter(|| decode_sector(black_box(uid), black_box(&sector)).unwrap())
    });

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let record = create_record();

    c.bench_function("sector_roundtrip", |b| {
        b.iter(|| {
            let sector = encode_sector(black_box(&record)).unwrap();
            decode_sector(record.uid(), &sector).unwrap()
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_roundtrip);
criterion_main!(benches);
