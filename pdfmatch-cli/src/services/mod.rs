// Business logic services layer
//
// Pure matching logic lives here, reusable from the CLI handlers and
// exercised directly by the tests.

pub mod matching;
