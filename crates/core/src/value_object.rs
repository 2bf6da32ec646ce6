//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**; two value objects with the same
/// attribute values are equal. They are immutable: to "modify" one, build a
/// new one.
///
/// - **Value Object**: `Quantity(10)`, an `(item, warehouse)` key
/// - **Entity**: an inventory level or a stock movement
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
