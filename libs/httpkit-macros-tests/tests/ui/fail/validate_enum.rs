// Enums cannot be validated field by field

use httpkit_validate::Validate;

#[derive(Validate)]
pub enum Kind {
    A,
    B,
}

fn main() {}
