use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prototext_lexer::{parse_string, ChunkedSliceInput, TokenType, Tokenizer, VecCollector};

/// Generate descriptor-like source text of various sizes.
fn generate_schema(size_category: &str) -> String {
    let blocks = match size_category {
        "small" => 4,
        "medium" => 64,
        _ => 512,
    };

    let mut content = String::new();
    content.push_str("// generated benchmark corpus\nsyntax = \"proto2\";\n\n");
    for i in 0..blocks {
        content.push_str(&format!(
            "/* Service block {i}\n * with a block comment header\n */\n\
             message Record{i} {{\n\
             \toptional int32 id = {field};\n\
             \toptional string name = 2 [default = \"record-{i}\\n\"];\n\
             \trepeated fixed64 mask = 3 [default = 0x{i:x}F];\n\
             \toptional double ratio = 4 [default = {i}.5e-2];\n\
             \toptional string path = 5 [default = \"C:\\\\data\\\\{i}\\u0041\"];\n\
             }}\n\n",
            i = i,
            field = i + 1,
        ));
    }
    content
}

fn count_tokens(input: &[u8]) -> usize {
    let mut errors = VecCollector::new();
    let mut count = 0;
    {
        let mut tokenizer = Tokenizer::from_slice(input, &mut errors);
        while tokenizer.next_token() {
            count += 1;
        }
    }
    count
}

fn bench_whole_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_slice");
    for size in ["small", "medium", "large"] {
        let content = generate_schema(size);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| count_tokens(black_box(content.as_bytes())));
        });
    }
    group.finish();
}

fn bench_chunked(c: &mut Criterion) {
    let content = generate_schema("medium");
    let mut group = c.benchmark_group("tokenize_chunked");
    group.throughput(Throughput::Bytes(content.len() as u64));
    for chunk_size in [64usize, 4096] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut errors = VecCollector::new();
                    let mut count = 0;
                    {
                        let source =
                            ChunkedSliceInput::new(black_box(content.as_bytes()), chunk_size);
                        let mut tokenizer = Tokenizer::new(Box::new(source), &mut errors);
                        while tokenizer.next_token() {
                            count += 1;
                        }
                    }
                    count
                });
            },
        );
    }
    group.finish();
}

fn bench_string_decoding(c: &mut Criterion) {
    let content = generate_schema("medium");

    // Pre-scan the string tokens so the benchmark measures decoding alone.
    let mut errors = VecCollector::new();
    let mut strings = Vec::new();
    {
        let mut tokenizer = Tokenizer::from_slice(content.as_bytes(), &mut errors);
        while tokenizer.next_token() {
            if tokenizer.current().token_type == TokenType::String {
                strings.push(tokenizer.current().text.to_vec());
            }
        }
    }

    c.bench_function("parse_string", |b| {
        b.iter(|| {
            let mut total = 0;
            for text in &strings {
                total += parse_string(black_box(text)).len();
            }
            total
        });
    });
}

criterion_group!(
    benches,
    bench_whole_slice,
    bench_chunked,
    bench_string_decoding
);
criterion_main!(benches);
