//! Binary-side test suite. Library modules carry their own unit tests;
//! the modules here cover the command-line helpers and whole flows from
//! shared link to rendered report.
