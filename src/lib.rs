pub mod rng;
pub mod sched;

#[cfg(test)]
mod test;
