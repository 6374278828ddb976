use fieldwise::Record;

#[derive(Record)]
#[record(label = "Other")]
struct Sample {
    value: i32,
}

fn main() {}
