// Main integration test file that includes all test modules

mod helpers {
    pub mod fixtures;
}

mod integration {
    pub mod search_tests;
    pub mod workflow_tests;
}
