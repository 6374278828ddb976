use fieldwise::Record;

#[derive(Record)]
struct Sample {
    #[record(bogus)]
    value: i32,
}

fn main() {}
