#![allow(dead_code)]

pub mod bot;
pub mod upstream;
