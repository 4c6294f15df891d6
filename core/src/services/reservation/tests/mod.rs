//! Tests for reservation workflow
