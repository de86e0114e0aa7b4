mod creation_tests;
mod lookup_tests;
mod mutation_tests;
