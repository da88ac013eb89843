use fieldcheck::Record;

#[derive(Record, Default)]
pub struct Address {
    #[is("required,len==5")]
    zip: String,
}

#[derive(Record, Default)]
pub struct Customer {
    #[is(readonly, "required")]
    id: u64,
    #[is(nested)]
    address: Address,
    #[is(nested, rename = "billing_address")]
    billing: Option<Box<Address>>,
    #[is("nonzero")]
    r#type: u8,
}

#[derive(Record)]
pub struct Marker;

fn main() {
    let mut customer = Customer::default();
    let _ = fieldcheck::validate(&mut customer);
    let _ = customer.id;
    let _ = fieldcheck::validate(&mut Marker);
}
