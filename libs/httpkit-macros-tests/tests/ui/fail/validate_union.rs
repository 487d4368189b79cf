// Unions have no readable fields

use httpkit_validate::Validate;

#[derive(Validate)]
pub union Bits {
    a: u32,
    b: f32,
}

fn main() {}
