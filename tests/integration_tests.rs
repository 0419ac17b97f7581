use edi_text::{
    classify_segment_tag, from_reader, parse_str, read_segments, segment, split, to_text,
    Container, EmptyHandling, Error, Message, MessageFamily, SegmentNode, SegmentReader,
    SegmentTag, SegmentTree, Separators,
};

fn edifact_with_caret() -> Separators {
    Separators::new()
        .with_segment_terminator("'")
        .with_data_element("+")
        .with_component_element(":")
        .with_repetition("^")
        .with_escape("?")
}

/// A purchase order mapped to segments by hand, standing in for a schema-driven builder.
struct PurchaseOrder {
    reference: String,
    number: String,
    lines: Vec<(String, u32)>,
}

impl SegmentTree for PurchaseOrder {
    fn segment_nodes(&self) -> edi_text::Result<Vec<SegmentNode>> {
        let mut nodes = vec![
            segment!("UNH", self.reference, ["ORDERS", "D", "96A", "UN"]),
            segment!("BGM", "220", self.number),
        ];
        for (index, (item, qty)) in self.lines.iter().enumerate() {
            nodes.push(segment!("LIN", index + 1, "", [item, "EN"]));
            nodes.push(segment!("QTY", [21, *qty]));
        }
        Ok(nodes)
    }

    fn message_family(&self) -> Option<MessageFamily> {
        Some(MessageFamily::Edifact)
    }
}

#[test]
fn test_unb_elements_after_tag() {
    let seps = edifact_with_caret();
    let segment = "UNB+UNOC?+3+SENDER'";
    let body = read_segments(segment, &seps).unwrap();
    let tokens = split(&body[0], &seps.escape, &seps.data_element, EmptyHandling::Keep, true)
        .unwrap();
    assert_eq!(tokens[1..], ["UNOC+3", "SENDER"]);
}

#[test]
fn test_existing_unt_is_replaced() {
    let seps = Separators::edifact();
    let message = Message::new(MessageFamily::Edifact)
        .with_segment(segment!("UNH", "1", ["ORDERS", "D", "96A", "UN"]))
        .with_segment(segment!("BGM", "220", "PO-1"))
        .with_segment(segment!("DTM", ["137", "20230101", "102"]))
        .with_segment(segment!("UNT", "0", "1"));

    let lines = to_text(&message, &seps, true).unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3], "UNT+4+0001'");
    assert_eq!(
        lines
            .iter()
            .filter(|l| classify_segment_tag(l).unwrap() == SegmentTag::Unt)
            .count(),
        1
    );
}

#[test]
fn test_existing_se_is_replaced() {
    let seps = Separators::x12().with_data_element("+");
    let message = Message::new(MessageFamily::X12)
        .with_segment(segment!("ST", "850", "0001"))
        .with_segment(segment!("BEG", "00", "SA", "PO-1"))
        .with_segment(segment!("REF", "DP", "038"))
        .with_segment(segment!("SE", "17", "0001"));

    let lines = to_text(&message, &seps, true).unwrap();
    assert_eq!(
        lines,
        vec!["ST+850+0001~", "BEG+00+SA+PO-1~", "REF+DP+038~", "SE+4+0001~"]
    );
}

#[test]
fn test_generate_text_is_idempotent() {
    let mut group = Container::new(
        Some(segment!("UNG", "ORDERS", "SENDER", "RECEIVER", ["230101", "1200"], "9")),
        |ung: &SegmentNode, count| segment!("UNE", count, ung.value(4).unwrap_or_default()),
        Separators::edifact(),
    );
    group.add_item(PurchaseOrder {
        reference: "ME1".to_string(),
        number: "PO-1".to_string(),
        lines: vec![("4000862141404".to_string(), 10)],
    });

    let first = group.generate_text(None).unwrap();
    let second = group.generate_text(None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.last().map(String::as_str), Some("UNE+1+9'"));
    assert_eq!(first[5], "UNT+5+0ME1'");
}

#[test]
fn test_nested_interchange() {
    let seps = Separators::edifact();
    let mut group = Container::new(
        Some(segment!("UNG", "ORDERS", "SENDER", "RECEIVER", ["230101", "1200"], "9")),
        |ung: &SegmentNode, count| segment!("UNE", count, ung.value(4).unwrap_or_default()),
        seps.clone(),
    );
    group.add_items(vec![
        PurchaseOrder {
            reference: "1".to_string(),
            number: "PO-1".to_string(),
            lines: vec![("4000862141404".to_string(), 10)],
        },
        PurchaseOrder {
            reference: "2".to_string(),
            number: "PO-2".to_string(),
            lines: vec![
                ("4000862141404".to_string(), 3),
                ("5412345000013".to_string(), 1),
            ],
        },
    ]);

    let mut interchange = Container::new(
        Some(segment!("UNB", ["UNOC", "3"], "SENDER", "RECEIVER", ["230101", "1200"], "77")),
        |unb: &SegmentNode, count| segment!("UNZ", count, unb.value(4).unwrap_or_default()),
        seps.clone(),
    );
    interchange.add_item(group);

    let lines = interchange.generate_text(None).unwrap();
    let expected = vec![
        "UNB+UNOC:3+SENDER+RECEIVER+230101:1200+77'",
        "UNG+ORDERS+SENDER+RECEIVER+230101:1200+9'",
        "UNH+1+ORDERS:D:96A:UN'",
        "BGM+220+PO-1'",
        "LIN+1++4000862141404:EN'",
        "QTY+21:10'",
        "UNT+5+0001'",
        "UNH+2+ORDERS:D:96A:UN'",
        "BGM+220+PO-2'",
        "LIN+1++4000862141404:EN'",
        "QTY+21:3'",
        "LIN+2++5412345000013:EN'",
        "QTY+21:1'",
        "UNT+7+0002'",
        "UNE+2+9'",
        "UNZ+1+77'",
    ];
    assert_eq!(lines, expected);

    // The written text parses back into the same segments.
    let nodes = parse_str(&lines.concat(), &seps).unwrap();
    assert_eq!(nodes.len(), expected.len());
    assert_eq!(nodes[13].value(0), Some("7"));
}

#[test]
fn test_service_advice_follows_separator_override() {
    let header = vec![
        SegmentNode::parse("UNA:+.? '", &Separators::edifact()).unwrap(),
        segment!("UNB", ["UNOC", "3"], "S"),
    ];
    let mut interchange = Container::new(
        Some(header),
        |_: &Vec<SegmentNode>, count| segment!("UNZ", count),
        Separators::edifact(),
    );
    interchange.add_item(
        Message::new(MessageFamily::Edifact)
            .with_segment(segment!("UNH", "1", ["ORDERS", "D"])),
    );

    let alt = Separators::edifact()
        .with_data_element("|")
        .with_component_element(">")
        .with_segment_terminator("~");
    let lines = interchange.generate_text(Some(&alt)).unwrap();
    assert_eq!(
        lines,
        vec!["UNA>|.?*~", "UNB|UNOC>3|S~", "UNH|1|ORDERS>D~", "UNT|2|0001~", "UNZ|1~"]
    );

    let text = lines.concat();
    let declared = Separators::from_una(&text).unwrap();
    assert_eq!(declared, alt);
    assert_eq!(parse_str(&text, &declared).unwrap().len(), lines.len());
}

#[test]
fn test_segment_reader_over_stream() {
    let text = "UNA:+.? '\nUNB+UNOC:3+SENDER'\n\nUNH+1+ORDERS:D:96A:UN'\nFTX+AAI+++It?'s fine'\nUNT+3+1'\nUNZ+1+1'\n";
    let seps = Separators::from_una(text).unwrap();
    let mut reader = SegmentReader::new(text.as_bytes(), seps.clone());

    let mut segments = Vec::new();
    loop {
        let segment = reader.read_segment().unwrap();
        if segment.is_empty() {
            break;
        }
        segments.push(segment);
    }
    assert_eq!(segments.len(), 6);
    assert_eq!(segments[3], "FTX+AAI+++It?'s fine");
    assert_eq!(reader.segments_read(), 6);

    let nodes = from_reader(text.as_bytes(), &seps).unwrap();
    assert_eq!(nodes[0].tag, "UNA");
    assert_eq!(nodes[3].value(3), Some("It's fine"));
}

#[test]
fn test_short_segment_classification_fails() {
    let err = classify_segment_tag("UN").unwrap_err();
    assert!(matches!(err, Error::SegmentTooShort { len: 2, .. }));
    assert!(err.to_string().contains("too short"));
}
