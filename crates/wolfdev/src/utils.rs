pub mod mem_reader;

#[cfg(test)]
pub(crate) mod testing;
