


#[cfg(test)]
mod test_suite;
