pub mod contract;
#[cfg(test)]
mod multitest;
