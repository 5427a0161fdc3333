mod common;
mod hours;
