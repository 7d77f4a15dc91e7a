pub mod common;



#[cfg(test)]
mod test_match_flow;
