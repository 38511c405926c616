//! Editor benchmarks
//!
//! Target: single keystroke on a 1000-paragraph document in <1ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quire_editor::{
    delete_and_merge, from_json, to_json, Doc, EditCommand, EditSession, EditorState, Node,
    NodeId, NodeRegistry, Position,
};

/// Document with `paragraphs` paragraphs of one text node each
fn generate_document(paragraphs: usize) -> (Doc, Vec<NodeId>) {
    let mut doc = Doc::new();
    let root = doc.root();
    let mut texts = Vec::with_capacity(paragraphs);

    for i in 0..paragraphs {
        let paragraph = Node::paragraph();
        let paragraph_id = paragraph.id;
        let text = Node::text(format!("Paragraph {} with a little bit of content", i));
        texts.push(text.id);
        doc = doc
            .insert_last(root, paragraph)
            .and_then(|d| d.insert_last(paragraph_id, text))
            .unwrap();
    }
    (doc, texts)
}

fn insert_text_small(c: &mut Criterion) {
    let (doc, texts) = generate_document(10);
    let state = EditorState::collapsed(doc, Position::new(texts[5], 4));

    c.bench_function("insert_text_10_paragraphs", |b| {
        b.iter(|| black_box(&state).insert_text("x"))
    });
}

fn insert_text_large(c: &mut Criterion) {
    let (doc, texts) = generate_document(1000);
    let state = EditorState::collapsed(doc, Position::new(texts[500], 4));

    c.bench_function("insert_text_1000_paragraphs", |b| {
        b.iter(|| black_box(&state).insert_text("x"))
    });
}

fn insert_paragraph_large(c: &mut Criterion) {
    let (doc, texts) = generate_document(1000);
    let state = EditorState::collapsed(doc, Position::new(texts[500], 9));

    c.bench_function("insert_paragraph_1000_paragraphs", |b| {
        b.iter(|| black_box(&state).insert_paragraph())
    });
}

fn delete_range_large(c: &mut Criterion) {
    let (doc, texts) = generate_document(1000);
    let from = Position::new(texts[100], 3);
    let to = Position::new(texts[900], 3);

    c.bench_function("delete_range_800_paragraphs", |b| {
        b.iter(|| delete_and_merge(black_box(&doc), from, to))
    });
}

fn session_typing(c: &mut Criterion) {
    c.bench_function("session_type_100_chars", |b| {
        b.iter(|| {
            let mut session = EditSession::new("bench", EditorState::empty());
            for _ in 0..100 {
                session
                    .apply(EditCommand::InsertText {
                        text: "a".to_string(),
                    })
                    .unwrap();
            }
            session
        })
    });
}

fn json_round_trip(c: &mut Criterion) {
    let (doc, _) = generate_document(200);
    let registry = NodeRegistry::new();

    c.bench_function("json_round_trip_200_paragraphs", |b| {
        b.iter(|| {
            let json = to_json(black_box(&doc)).unwrap();
            from_json(&json, &registry).unwrap()
        })
    });
}

criterion_group!(
    benches,
    insert_text_small,
    insert_text_large,
    insert_paragraph_large,
    delete_range_large,
    session_typing,
    json_round_trip
);
criterion_main!(benches);
