use fieldwise::Record;

#[derive(Record)]
struct Cached {
    id: u32,
    #[record(skip, rename = "cached")]
    cache: u64,
}

fn main() {}
