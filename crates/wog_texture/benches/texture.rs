use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

pub mod convert {
    use divan::Bencher;
    use wog_texture::{Arrangement, Texture};

    const SIZE: u32 = 512;

    fn get_input() -> Vec<u8> {
        let mut input = Vec::new();
        for value in [SIZE, SIZE, SIZE - 12, SIZE - 12, SIZE - 12, SIZE - 12] {
            input.extend_from_slice(&value.to_be_bytes());
        }
        input.extend_from_slice(&[0, 1, 2, 3, 0, 0, 0, 0]);
        input.extend((0..SIZE * SIZE * 4).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8));
        input
    }

    #[divan::bench]
    fn decode(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(Texture::decode(data.as_slice()).unwrap());
        });
    }

    #[divan::bench]
    fn to_image_plain(bencher: Bencher) {
        let texture = Texture::decode(get_input().as_slice()).unwrap();
        bencher.bench_local(move || {
            divan::black_box(texture.to_image(Arrangement::Plain));
        });
    }

    #[divan::bench]
    fn to_image_gradient(bencher: Bencher) {
        let texture = Texture::decode(get_input().as_slice()).unwrap();
        bencher.bench_local(move || {
            divan::black_box(texture.to_image(Arrangement::Gradient));
        });
    }
}
