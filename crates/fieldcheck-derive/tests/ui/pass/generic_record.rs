use fieldcheck::{FieldValue, Record};

#[derive(Record)]
pub struct Labeled<T>
where
    T: FieldValue,
{
    #[is("required")]
    label: String,
    #[is("nonzero")]
    value: T,
}

#[derive(Record)]
pub struct Envelope<R: Record> {
    #[is(nested)]
    body: R,
}

fn main() {
    let mut labeled = Labeled {
        label: "answer".to_string(),
        value: 42i64,
    };
    let problems = fieldcheck::validate(&mut labeled).unwrap();
    assert!(problems.is_empty());

    let mut envelope = Envelope { body: labeled };
    let _ = fieldcheck::validate(&mut envelope);
}
