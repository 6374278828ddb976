use fieldwise::Record;

#[derive(Record)]
struct Readings {
    #[record(repeated, has = "has_samples")]
    samples: Vec<u32>,
}

impl Readings {
    fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }
}

fn main() {}
