//! Built-in stacks, constructed through the template builder API.

pub mod wordpress;
