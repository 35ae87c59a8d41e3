mod gate_test;
mod helpers;
mod verification_test;
