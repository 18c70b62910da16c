use criterion::{black_box, criterion_group, criterion_main, Criterion};
use critbit_trie::bit_vec::BitVec;
use critbit_trie::critbit::CritBitTrie;
use rand::{Rng, SeedableRng};
use std::iter;

const NUM_OF_KEYS: usize = 1000;

fn random_keys() -> Vec<BitVec> {
    let mut rng: rand::XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_KEYS)
        .map(|_| {
            let len = rng.gen_range(1, 6);
            let bytes = iter::repeat(())
                .map(|()| rng.gen::<u8>())
                .take(len)
                .collect::<Vec<u8>>();
            BitVec::from_bytes(&bytes)
        })
        .collect()
}

fn bench_critbit_insert(c: &mut Criterion) {
    let keys = random_keys();
    c.bench_function("bench critbit insert", move |b| {
        b.iter(|| {
            let mut trie = CritBitTrie::new();
            for key in &keys {
                trie.insert(key);
            }
        })
    });
}

fn bench_critbit_search(c: &mut Criterion) {
    let keys = random_keys();
    let mut trie = CritBitTrie::new();
    for key in &keys {
        trie.insert(key);
    }

    c.bench_function("bench critbit search", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(trie.search(key));
            }
        })
    });
}

fn bench_critbit_upper(c: &mut Criterion) {
    let keys = random_keys();
    let mut trie = CritBitTrie::new();
    for key in &keys {
        trie.insert(key);
    }

    c.bench_function("bench critbit upper", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(trie.upper(key).unwrap());
            }
        })
    });
}

criterion_group!(
    benches,
    bench_critbit_insert,
    bench_critbit_search,
    bench_critbit_upper
);
criterion_main!(benches);
