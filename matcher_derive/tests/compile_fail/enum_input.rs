use fieldwise::Record;

#[derive(Record)]
enum State {
    On,
    Off,
}

fn main() {}
