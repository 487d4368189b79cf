// Generic, unit, raw-identifier and untagged structs all derive

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Page<T> {
    #[validate("struct")]
    pub item: T,
    pub total: u64,
}

#[derive(Validate)]
pub struct Marker;

#[derive(Validate)]
pub struct Item {
    #[validate("required")]
    pub r#type: String,
}

#[derive(Validate)]
pub struct Untagged {
    pub id: u64,
}

fn main() {
    assert_eq!(Page::<Item>::schema().fields().len(), 1);
    assert!(Marker::schema().fields().is_empty());
    assert_eq!(Item::schema().fields()[0].ident(), "type");
    assert!(Untagged::schema().fields().is_empty());
}
