use fieldwise::Record;

#[derive(Record)]
struct Level {
    #[record(optional, has = "has_value")]
    value: Option<i32>,
}

impl Level {
    fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

fn main() {}
