// Tuple structs have no field names to report

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Pair(String, u32);

fn main() {}
