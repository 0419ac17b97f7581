use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use edi_text::{
    read_segments, segment, split, Container, EmptyHandling, Message, MessageFamily, SegmentNode,
    Separators,
};

fn sample_interchange(messages: usize) -> String {
    let mut text = String::from("UNB+UNOC:3+SENDER+RECEIVER+230101:1200+1'");
    for n in 0..messages {
        text.push_str(&format!(
            "UNH+{n}+ORDERS:D:96A:UN'BGM+220+PO-{n}'FTX+AAI+++Handle with care?: 10?+ units'UNT+4+{n}'"
        ));
    }
    text.push_str(&format!("UNZ+{messages}+1'"));
    text
}

fn benchmark_split_segment(c: &mut Criterion) {
    let segment = "FTX+AAI+++Handle with care?: 10?+ units+more+text+here??+end";

    c.bench_function("split_escaped_segment", |b| {
        b.iter(|| split(black_box(segment), "?", "+", EmptyHandling::Keep, true))
    });
}

fn benchmark_read_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_segments");
    let seps = Separators::edifact();

    for size in [10, 100, 1000].iter() {
        let text = sample_interchange(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| read_segments(black_box(text), &seps))
        });
    }
    group.finish();
}

fn benchmark_generate_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_text");
    let seps = Separators::x12();

    for size in [10, 100, 1000].iter() {
        let mut envelope = Container::new(
            Some(segment!("GS", "PO", "SENDER", "RECEIVER", "20230101", "1200", "7", "X", "005010")),
            |gs: &SegmentNode, count| segment!("GE", count, gs.value(5).unwrap_or_default()),
            seps.clone(),
        );
        envelope.add_items((0..*size).map(|n| {
            Message::new(MessageFamily::X12)
                .with_segment(segment!("ST", "850", format!("{n:04}")))
                .with_segment(segment!("BEG", "00", "SA", format!("PO-{n}")))
                .with_segment(segment!("PO1", "1", "10", "EA", "9.99"))
        }));

        group.bench_with_input(BenchmarkId::from_parameter(size), &envelope, |b, envelope| {
            b.iter(|| envelope.generate_text(None))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_split_segment,
    benchmark_read_segments,
    benchmark_generate_text
);
criterion_main!(benches);
