use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_input() -> Vec<u8> {
    std::fs::read(format!(
        "{}/resources/sample.asr_en",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

pub mod read {
    use asura_htxt::HtxtReader;
    use divan::Bencher;

    #[divan::bench]
    fn decode(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|data| {
            divan::black_box(HtxtReader::from_bytes(data).unwrap());
        });
    }
}

pub mod write {
    use asura_htxt::{encode, HtxtReader};
    use divan::Bencher;

    #[divan::bench]
    fn encode_container(bencher: Bencher) {
        bencher
            .with_inputs(|| HtxtReader::from_bytes(&super::get_input()).unwrap())
            .bench_refs(|htxt| {
                divan::black_box(encode(htxt).unwrap());
            });
    }
}
