//! Reading an EDIFACT interchange and writing an X12 group.
//!
//! Run with: cargo run --example envelope

use edi_text::{
    parse_str, segment, Container, Message, MessageFamily, SegmentNode, Separators,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Reading: the UNA advice declares the separators
    let text = "UNA:+.? 'UNB+UNOC:3+SENDER+RECEIVER+230101:1200+1'UNH+1+ORDERS:D:96A:UN'FTX+AAI+++Fragile?: 10?+ units'UNT+3+1'UNZ+1+1'";
    let seps = Separators::from_una(text)?;
    for node in parse_str(text, &seps)? {
        println!("{:<4} {:?}", node.tag, node.elements);
    }
    println!();

    // Writing: the group trailer and the SE trailer are computed on the fly
    let mut group = Container::new(
        Some(segment!("GS", "PO", "SENDER", "RECEIVER", "20230101", "1200", "7", "X", "005010")),
        |gs: &SegmentNode, count| segment!("GE", count, gs.value(5).unwrap_or_default()),
        Separators::x12(),
    );
    for n in 1..=2 {
        group.add_item(
            Message::new(MessageFamily::X12)
                .with_segment(segment!("ST", "850", format!("{n:04}")))
                .with_segment(segment!("BEG", "00", "SA", format!("PO-{n}")))
                .with_segment(segment!("PO1", "1", "10", "EA", "9.99")),
        );
    }

    for line in group.generate_text(None)? {
        println!("{}", line);
    }

    // Same group, newline-terminated
    let lines = Separators::x12().with_segment_terminator("\n");
    print!("\n{}", group.generate_text(Some(&lines))?.concat());

    Ok(())
}
