//! Shared fixtures for the test suites
//!
//!     The canonical fixture mirrors the source
//!
//!         class X {
//!             fun bar() {
//!                 while (x < y) {
//!                     if (x == 100) {
//!                         print(x)
//!                     }
//!                 }
//!             }
//!         }
//!
//!     as a file tree with the structural element layout the dataset
//!     contract is specified against: the `VALUE_ARGUMENT` wrapping `x`
//!     sits at depth 13, and its root path reads
//!     `FILE ↓ CLASS ↓ CLASS_BODY ↓ FUN ↓ BLOCK ↓ WHILE ↓ BODY ↓ BLOCK ↓
//!     IF ↓ THEN ↓ BLOCK ↓ CALL_EXPRESSION ↓ VALUE_ARGUMENT_LIST`.

use crate::tree::{SourceTree, TreeBuilder};

/// The `while (x < y) { if (x == 100) { print(x) } }` fixture.
pub fn scenario_tree() -> SourceTree {
    let mut builder = TreeBuilder::new("FILE");
    builder.leaf("PACKAGE_DIRECTIVE", "").leaf("IMPORT_LIST", "");

    builder.open("CLASS").open("CLASS_BODY").open("FUN");
    builder.leaf("VALUE_PARAMETER_LIST", "");
    builder.open("BLOCK");

    builder.open("WHILE");
    builder
        .open("CONDITION")
        .open("BINARY_EXPRESSION")
        .leaf("REFERENCE_EXPRESSION", "x")
        .leaf("OPERATION_REFERENCE", "<")
        .leaf("REFERENCE_EXPRESSION", "y")
        .close()
        .close();

    builder.open("BODY").open("BLOCK");
    builder.open("IF");
    builder
        .open("CONDITION")
        .open("BINARY_EXPRESSION")
        .leaf("REFERENCE_EXPRESSION", "x")
        .leaf("OPERATION_REFERENCE", "==")
        .leaf("INTEGER_CONSTANT", "100")
        .close()
        .close();
    builder
        .open("THEN")
        .open("BLOCK")
        .open("CALL_EXPRESSION")
        .leaf("REFERENCE_EXPRESSION", "print")
        .open("VALUE_ARGUMENT_LIST")
        .open("VALUE_ARGUMENT")
        .leaf("REFERENCE_EXPRESSION", "x")
        .close()
        .close()
        .close()
        .close()
        .close();
    builder.close(); // IF
    builder.close().close(); // BLOCK, BODY
    builder.close(); // WHILE

    builder.close().close().close().close(); // BLOCK, FUN, CLASS_BODY, CLASS
    builder.build()
}
