use fieldwise::Record;

#[derive(Record)]
struct Samples {
    #[record(optional, repeated)]
    values: Vec<i32>,
}

fn main() {}
