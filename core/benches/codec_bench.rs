use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wss_agent_core::compression::{ChunkPolicy, ChunkedFileCodec, StreamCompressor, StreamDecompressor};
use wss_agent_core::config::CodecConfig;

fn payload(len: usize) -> String {
    let record = "{\"groupId\":\"org.example\",\"artifactId\":\"lib\",\"version\":\"1.0.0\",\"sha1\":\"da39a3ee\"},";
    record.repeat(len / record.len() + 1)[..len].to_string()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_compress");

    for size in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024].iter() {
        let text = payload(*size);
        group.throughput(Throughput::Bytes(*size as u64));

        for (name, policy) in [("fixed", ChunkPolicy::default()), ("proportional", ChunkPolicy::Proportional)] {
            let compressor = StreamCompressor::new(&CodecConfig::default().with_chunk_policy(policy));
            group.bench_with_input(BenchmarkId::new(name, size), &text, |b, text| {
                b.iter(|| compressor.compress(black_box(text)).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_decompress");
    let compressor = StreamCompressor::default();
    let decompressor = StreamDecompressor::default();

    for size in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024].iter() {
        let encoded = compressor.compress(&payload(*size)).unwrap();
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| decompressor.decompress(black_box(encoded)).unwrap())
        });
    }

    group.finish();
}

fn bench_file_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_compress");
    let dir = tempfile::tempdir().unwrap();
    let codec = ChunkedFileCodec::new(&CodecConfig::default().with_temp_dir(dir.path()));

    for size in [1024 * 1024, 8 * 1024 * 1024].iter() {
        let text = payload(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| codec.compress_to_file(black_box(text)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress, bench_file_codec);
criterion_main!(benches);
