//! Benchmarks for unalto parsing and matching performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic METS/ALTO data.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unalto::{match_tokens, MatchOptions};

const WORDS: [&str; 8] = [
    "the", "great", "fire", "of", "london", "destroyed", "many", "houses",
];

/// Creates a synthetic content file with the given number of text blocks.
fn create_test_alto(block_count: usize) -> String {
    let mut content = String::new();
    content.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    content.push_str("<alto xmlns=\"http://www.loc.gov/standards/alto/ns-v2#\"><Layout>");
    content.push_str("<Page ID=\"P1\" WIDTH=\"3000\" HEIGHT=\"4000\"><PrintSpace>");

    for block in 0..block_count {
        content.push_str(&format!("<ComposedBlock ID=\"CB{}\" TYPE=\"Article\">", block));
        content.push_str(&format!(
            "<TextBlock ID=\"TB{}\" HPOS=\"10\" VPOS=\"{}\" WIDTH=\"900\" HEIGHT=\"40\"><TextLine>",
            block,
            block * 50
        ));
        for (i, word) in WORDS.iter().enumerate() {
            content.push_str(&format!(
                "<String CONTENT=\"{}\" HPOS=\"{}\" VPOS=\"{}\" WIDTH=\"100\" HEIGHT=\"40\" WC=\"0.87\"/><SP/>",
                word,
                10 + i * 110,
                block * 50
            ));
        }
        content.push_str("</TextLine></TextBlock></ComposedBlock>");
    }

    content.push_str("</PrintSpace></Page></Layout></alto>\n");
    content
}

/// Creates a synthetic structural file declaring the given number of pages.
fn create_test_mets(page_count: usize) -> String {
    let mut content = String::new();
    content.push_str("<mets:mets xmlns:mets=\"http://www.loc.gov/METS/\" xmlns:mods=\"http://www.loc.gov/mods/v3\">");
    content.push_str("<mets:dmdSec><mods:mods><mods:title>Benchmark</mods:title>");
    content.push_str("<mods:dateIssued>1870-09-01</mods:dateIssued></mods:mods></mets:dmdSec>");
    content.push_str("<mets:structMap TYPE=\"PHYSICAL\"><mets:div TYPE=\"issue\">");
    for page in 1..=page_count {
        content.push_str(&format!(
            "<mets:div ID=\"phys{0}\" TYPE=\"page\" ORDER=\"{0}\"><mets:div ID=\"pa{0:04}001\" TYPE=\"article\"/></mets:div>",
            page
        ));
    }
    content.push_str("</mets:div></mets:structMap></mets:mets>");
    content
}

/// Benchmark content file parsing at various sizes.
fn bench_page_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_parsing");

    for block_count in [10, 100, 500].iter() {
        let data = create_test_alto(*block_count);

        group.bench_function(format!("{}_blocks", block_count), |b| {
            b.iter(|| unalto::parse_page_bytes(black_box(data.as_bytes())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark structural file parsing.
fn bench_structure_parsing(c: &mut Criterion) {
    let data = create_test_mets(200);

    c.bench_function("structure_200_pages", |b| {
        b.iter(|| unalto::parse_structure_bytes(black_box(data.as_bytes()), "0001_0001").unwrap());
    });
}

/// Benchmark token ranking.
fn bench_matching(c: &mut Criterion) {
    let page = unalto::parse_page_bytes(create_test_alto(500).as_bytes()).unwrap();
    let tokens: Vec<&str> = page.words().collect();
    let options = MatchOptions::new().with_threshold(0.6);

    c.bench_function("match_4000_tokens", |b| {
        b.iter(|| match_tokens(black_box(&tokens), black_box("fires"), &options));
    });
}

criterion_group!(
    benches,
    bench_page_parsing,
    bench_structure_parsing,
    bench_matching,
);
criterion_main!(benches);
