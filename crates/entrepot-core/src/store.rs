//! The `WarehouseStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `entrepot-store-sqlite`). Higher layers (`entrepot-api`,
//! `entrepot-server`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  carrier::{Carrier, CarrierCredentials, NewCarrier},
  catalog::{Aisle, Column, NewColumn, NewSlot, Slot},
  package::{NewPackage, Package},
  placement::{NewPlacement, Placement},
  report::{PlacementDetails, SlotContext},
};

/// Abstraction over a warehouse store backend.
///
/// The placement ledger is insert-only on the move path: assigning a package
/// appends a row, and the current location is always the newest row for that
/// package. The only DELETE a backend may issue against the ledger is the
/// explicit [`remove_placement`](Self::remove_placement) withdrawal.
///
/// Every mutating operation runs its check-then-act sequence as a single
/// atomic unit against the backend; callers never observe a half-applied
/// assignment.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Aisles ────────────────────────────────────────────────────────────

  /// Create and persist a new aisle with the given label number.
  fn add_aisle(
    &self,
    number: i64,
  ) -> impl Future<Output = Result<Aisle, Self::Error>> + Send + '_;

  /// Retrieve an aisle by id. Returns `None` if not found.
  fn get_aisle(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Aisle>, Self::Error>> + Send + '_;

  /// List all aisles, ordered by id.
  fn list_aisles(
    &self,
  ) -> impl Future<Output = Result<Vec<Aisle>, Self::Error>> + Send + '_;

  /// Delete an aisle. Fails with `AisleHasColumns` while child columns
  /// exist; deletion is never cascaded.
  fn remove_aisle(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Columns ───────────────────────────────────────────────────────────

  /// Create a column under an existing aisle. Fails with `AisleNotFound`
  /// if the parent is absent.
  fn add_column(
    &self,
    input: NewColumn,
  ) -> impl Future<Output = Result<Column, Self::Error>> + Send + '_;

  /// Retrieve a column by id. Returns `None` if not found.
  fn get_column(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Column>, Self::Error>> + Send + '_;

  /// List columns, optionally restricted to one aisle.
  fn list_columns(
    &self,
    aisle_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Column>, Self::Error>> + Send + '_;

  /// Delete a column. Fails with `ColumnHasSlots` while slots exist.
  fn remove_column(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Slots ─────────────────────────────────────────────────────────────

  /// Create a slot under an existing column.
  ///
  /// Fails with `ColumnNotFound` if the parent is absent, `InvalidLevel`
  /// if the level is outside 0..=3, and `DuplicateSlotPosition` if the
  /// column already has a slot at that level.
  fn add_slot(
    &self,
    input: NewSlot,
  ) -> impl Future<Output = Result<Slot, Self::Error>> + Send + '_;

  /// Retrieve a slot by id. Returns `None` if not found.
  fn get_slot(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Slot>, Self::Error>> + Send + '_;

  /// List slots, optionally restricted to one column.
  fn list_slots(
    &self,
    column_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Slot>, Self::Error>> + Send + '_;

  /// Delete a slot. Fails with `SlotHasPlacements` while ledger rows
  /// reference it.
  fn remove_slot(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Packages ──────────────────────────────────────────────────────────

  /// Register a new package.
  fn add_package(
    &self,
    input: NewPackage,
  ) -> impl Future<Output = Result<Package, Self::Error>> + Send + '_;

  /// Retrieve a package by id. Returns `None` if not found.
  fn get_package(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Package>, Self::Error>> + Send + '_;

  /// List all packages, ordered by id.
  fn list_packages(
    &self,
  ) -> impl Future<Output = Result<Vec<Package>, Self::Error>> + Send + '_;

  /// Delete a package. Fails with `PackageHasPlacements` while ledger rows
  /// reference it, so the ledger never dangles.
  fn remove_package(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Carriers ──────────────────────────────────────────────────────────

  /// Register a new carrier. Fails with `LoginTaken` if the login is in
  /// use.
  fn add_carrier(
    &self,
    input: NewCarrier,
  ) -> impl Future<Output = Result<Carrier, Self::Error>> + Send + '_;

  /// Retrieve a carrier by id. Returns `None` if not found.
  fn get_carrier(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Carrier>, Self::Error>> + Send + '_;

  /// List all carriers, ordered by id.
  fn list_carriers(
    &self,
  ) -> impl Future<Output = Result<Vec<Carrier>, Self::Error>> + Send + '_;

  /// Look up a carrier and its password hash by login, for the auth layer.
  fn find_carrier_by_login<'a>(
    &'a self,
    login: &'a str,
  ) -> impl Future<Output = Result<Option<CarrierCredentials>, Self::Error>>
  + Send
  + 'a;

  // ── Placement ledger ──────────────────────────────────────────────────

  /// Insert a ledger row with a caller-supplied (or store-stamped) deposit
  /// time. Verifies carrier, package, and slot existence in the same
  /// transaction as the insert.
  ///
  /// This is the low-level entry; interactive callers want
  /// [`assign_package`](Self::assign_package).
  fn record_placement(
    &self,
    input: NewPlacement,
  ) -> impl Future<Output = Result<Placement, Self::Error>> + Send + '_;

  /// Assign a package to a slot — the primary entry point.
  ///
  /// One atomic unit covering: carrier/package/slot existence checks, the
  /// current-placement lookup, the idempotent short-circuit (re-placing a
  /// package into the slot it already occupies returns the existing row
  /// unchanged), the slot-occupancy check (`SlotOccupied` if a different
  /// package currently sits there), and the append of the new row.
  fn assign_package(
    &self,
    carrier_id: i64,
    package_id: i64,
    slot_id: i64,
  ) -> impl Future<Output = Result<Placement, Self::Error>> + Send + '_;

  /// Explicitly withdraw a placement: deletes the newest ledger row
  /// matching the triple. Fails with `PlacementNotFound` if none matches.
  fn remove_placement(
    &self,
    carrier_id: i64,
    package_id: i64,
    slot_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The newest ledger row for a package, or `None` — including for
  /// package ids that were never registered.
  fn current_placement(
    &self,
    package_id: i64,
  ) -> impl Future<Output = Result<Option<Placement>, Self::Error>> + Send + '_;

  /// All ledger rows for a package, newest first.
  fn placement_history(
    &self,
    package_id: i64,
  ) -> impl Future<Output = Result<Vec<Placement>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Every slot with its full location path (left joins; broken parents
  /// surface as `None` fields).
  fn slots_with_context(
    &self,
  ) -> impl Future<Output = Result<Vec<SlotContext>, Self::Error>> + Send + '_;

  /// Placements joined with package dimensions and location path.
  ///
  /// With `include_history = false`, only each package's current row is
  /// returned (the live inventory view); with `true`, the full ledger.
  fn placements_with_details(
    &self,
    include_history: bool,
  ) -> impl Future<Output = Result<Vec<PlacementDetails>, Self::Error>>
  + Send
  + '_;

  /// Packages whose *current* placement is the given slot. Under the
  /// exclusivity invariant this has 0 or 1 entries; backends log more than
  /// one as a data-integrity warning rather than failing.
  fn occupancy_of(
    &self,
    slot_id: i64,
  ) -> impl Future<Output = Result<Vec<Placement>, Self::Error>> + Send + '_;
}
