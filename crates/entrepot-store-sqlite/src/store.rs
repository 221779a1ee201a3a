//! [`SqliteStore`] — the SQLite implementation of [`WarehouseStore`].
//!
//! Every check-then-act sequence runs inside one rusqlite transaction, so the
//! assignment sequence (existence checks, current-placement lookup, append)
//! can never interleave with a concurrent writer. Domain failures discovered
//! inside a transaction closure travel out as a nested `Result`, because the
//! closure's own error channel belongs to `tokio_rusqlite`.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use entrepot_core::{
  Error as CoreError,
  carrier::{Carrier, CarrierCredentials, NewCarrier},
  catalog::{Aisle, Column, NewColumn, NewSlot, Slot},
  package::{NewPackage, Package},
  placement::{NewPlacement, Placement},
  report::{PlacementDetails, SlotContext},
  store::WarehouseStore,
};

use crate::{
  Error, Result,
  encode::{RawCarrier, RawPlacement, RawPlacementDetails, encode_date, encode_dt},
  schema::SCHEMA,
};

type DomainResult<T> = std::result::Result<T, CoreError>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Entrepot warehouse store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── WarehouseStore impl ─────────────────────────────────────────────────────

impl WarehouseStore for SqliteStore {
  type Error = Error;

  // ── Aisles ──────────────────────────────────────────────────────────────

  async fn add_aisle(&self, number: i64) -> Result<Aisle> {
    let aisle_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO aisles (number) VALUES (?1)",
          rusqlite::params![number],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Aisle { aisle_id, number })
  }

  async fn get_aisle(&self, id: i64) -> Result<Option<Aisle>> {
    let aisle = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT aisle_id, number FROM aisles WHERE aisle_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Aisle { aisle_id: row.get(0)?, number: row.get(1)? })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(aisle)
  }

  async fn list_aisles(&self) -> Result<Vec<Aisle>> {
    let aisles = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT aisle_id, number FROM aisles ORDER BY aisle_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Aisle { aisle_id: row.get(0)?, number: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(aisles)
  }

  async fn remove_aisle(&self, id: i64) -> Result<()> {
    let out: DomainResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !row_exists(&tx, "SELECT 1 FROM aisles WHERE aisle_id = ?1", id)? {
          return Ok(Err(CoreError::AisleNotFound(id)));
        }
        if row_exists(&tx, "SELECT 1 FROM columns WHERE aisle_id = ?1", id)? {
          return Ok(Err(CoreError::AisleHasColumns(id)));
        }

        tx.execute("DELETE FROM aisles WHERE aisle_id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    out.map_err(Error::Core)
  }

  // ── Columns ─────────────────────────────────────────────────────────────

  async fn add_column(&self, input: NewColumn) -> Result<Column> {
    let NewColumn { aisle_id, number } = input;

    let out: DomainResult<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !row_exists(&tx, "SELECT 1 FROM aisles WHERE aisle_id = ?1", aisle_id)? {
          return Ok(Err(CoreError::AisleNotFound(aisle_id)));
        }

        tx.execute(
          "INSERT INTO columns (number, aisle_id) VALUES (?1, ?2)",
          rusqlite::params![number, aisle_id],
        )?;
        let column_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(column_id))
      })
      .await?;

    let column_id = out.map_err(Error::Core)?;
    Ok(Column { column_id, number, aisle_id })
  }

  async fn get_column(&self, id: i64) -> Result<Option<Column>> {
    let column = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT column_id, number, aisle_id FROM columns WHERE column_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Column {
                  column_id: row.get(0)?,
                  number:    row.get(1)?,
                  aisle_id:  row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(column)
  }

  async fn list_columns(&self, aisle_id: Option<i64>) -> Result<Vec<Column>> {
    let columns = self
      .conn
      .call(move |conn| {
        let map = |row: &rusqlite::Row<'_>| {
          Ok(Column {
            column_id: row.get(0)?,
            number:    row.get(1)?,
            aisle_id:  row.get(2)?,
          })
        };

        let rows = if let Some(aisle) = aisle_id {
          let mut stmt = conn.prepare(
            "SELECT column_id, number, aisle_id FROM columns
             WHERE aisle_id = ?1 ORDER BY column_id",
          )?;
          stmt
            .query_map(rusqlite::params![aisle], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT column_id, number, aisle_id FROM columns ORDER BY column_id",
          )?;
          stmt
            .query_map([], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(columns)
  }

  async fn remove_column(&self, id: i64) -> Result<()> {
    let out: DomainResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !row_exists(&tx, "SELECT 1 FROM columns WHERE column_id = ?1", id)? {
          return Ok(Err(CoreError::ColumnNotFound(id)));
        }
        if row_exists(&tx, "SELECT 1 FROM slots WHERE column_id = ?1", id)? {
          return Ok(Err(CoreError::ColumnHasSlots(id)));
        }

        tx.execute(
          "DELETE FROM columns WHERE column_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    out.map_err(Error::Core)
  }

  // ── Slots ───────────────────────────────────────────────────────────────

  async fn add_slot(&self, input: NewSlot) -> Result<Slot> {
    if !input.level_in_range() {
      return Err(Error::Core(CoreError::InvalidLevel(input.level)));
    }
    let NewSlot { column_id, level, max_volume, max_weight } = input;

    let out: DomainResult<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !row_exists(&tx, "SELECT 1 FROM columns WHERE column_id = ?1", column_id)? {
          return Ok(Err(CoreError::ColumnNotFound(column_id)));
        }

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM slots WHERE column_id = ?1 AND level = ?2",
            rusqlite::params![column_id, level],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(CoreError::DuplicateSlotPosition { column_id, level }));
        }

        tx.execute(
          "INSERT INTO slots (level, max_volume, max_weight, column_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![level, max_volume, max_weight, column_id],
        )?;
        let slot_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(slot_id))
      })
      .await?;

    let slot_id = out.map_err(Error::Core)?;
    Ok(Slot { slot_id, level, max_volume, max_weight, column_id })
  }

  async fn get_slot(&self, id: i64) -> Result<Option<Slot>> {
    let slot = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT slot_id, level, max_volume, max_weight, column_id
               FROM slots WHERE slot_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Slot {
                  slot_id:    row.get(0)?,
                  level:      row.get(1)?,
                  max_volume: row.get(2)?,
                  max_weight: row.get(3)?,
                  column_id:  row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(slot)
  }

  async fn list_slots(&self, column_id: Option<i64>) -> Result<Vec<Slot>> {
    let slots = self
      .conn
      .call(move |conn| {
        let map = |row: &rusqlite::Row<'_>| {
          Ok(Slot {
            slot_id:    row.get(0)?,
            level:      row.get(1)?,
            max_volume: row.get(2)?,
            max_weight: row.get(3)?,
            column_id:  row.get(4)?,
          })
        };

        let rows = if let Some(column) = column_id {
          let mut stmt = conn.prepare(
            "SELECT slot_id, level, max_volume, max_weight, column_id
             FROM slots WHERE column_id = ?1 ORDER BY slot_id",
          )?;
          stmt
            .query_map(rusqlite::params![column], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT slot_id, level, max_volume, max_weight, column_id
             FROM slots ORDER BY slot_id",
          )?;
          stmt
            .query_map([], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(slots)
  }

  async fn remove_slot(&self, id: i64) -> Result<()> {
    let out: DomainResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !row_exists(&tx, "SELECT 1 FROM slots WHERE slot_id = ?1", id)? {
          return Ok(Err(CoreError::SlotNotFound(id)));
        }
        if row_exists(&tx, "SELECT 1 FROM placements WHERE slot_id = ?1", id)? {
          return Ok(Err(CoreError::SlotHasPlacements(id)));
        }

        tx.execute("DELETE FROM slots WHERE slot_id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    out.map_err(Error::Core)
  }

  // ── Packages ────────────────────────────────────────────────────────────

  async fn add_package(&self, input: NewPackage) -> Result<Package> {
    let NewPackage { length, width, height, weight } = input;

    let package_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO packages (length, width, height, weight)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![length, width, height, weight],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Package { package_id, length, width, height, weight })
  }

  async fn get_package(&self, id: i64) -> Result<Option<Package>> {
    let package = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT package_id, length, width, height, weight
               FROM packages WHERE package_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Package {
                  package_id: row.get(0)?,
                  length:     row.get(1)?,
                  width:      row.get(2)?,
                  height:     row.get(3)?,
                  weight:     row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(package)
  }

  async fn list_packages(&self) -> Result<Vec<Package>> {
    let packages = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT package_id, length, width, height, weight
           FROM packages ORDER BY package_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Package {
              package_id: row.get(0)?,
              length:     row.get(1)?,
              width:      row.get(2)?,
              height:     row.get(3)?,
              weight:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(packages)
  }

  async fn remove_package(&self, id: i64) -> Result<()> {
    let out: DomainResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !row_exists(&tx, "SELECT 1 FROM packages WHERE package_id = ?1", id)? {
          return Ok(Err(CoreError::PackageNotFound(id)));
        }
        if row_exists(&tx, "SELECT 1 FROM placements WHERE package_id = ?1", id)? {
          return Ok(Err(CoreError::PackageHasPlacements(id)));
        }

        tx.execute(
          "DELETE FROM packages WHERE package_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    out.map_err(Error::Core)
  }

  // ── Carriers ────────────────────────────────────────────────────────────

  async fn add_carrier(&self, input: NewCarrier) -> Result<Carrier> {
    let NewCarrier {
      first_name,
      last_name,
      born_on,
      hired_on,
      login,
      password_hash,
    } = input;

    let born_str  = encode_date(born_on);
    let hired_str = encode_date(hired_on);
    let login_cl  = login.clone();
    let fn_cl     = first_name.clone();
    let ln_cl     = last_name.clone();

    let out: DomainResult<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM carriers WHERE login = ?1",
            rusqlite::params![login_cl],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(CoreError::LoginTaken(login_cl)));
        }

        tx.execute(
          "INSERT INTO carriers
             (first_name, last_name, born_on, hired_on, login, password_hash)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![fn_cl, ln_cl, born_str, hired_str, login_cl, password_hash],
        )?;
        let carrier_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(carrier_id))
      })
      .await?;

    let carrier_id = out.map_err(Error::Core)?;
    Ok(Carrier { carrier_id, first_name, last_name, born_on, hired_on, login })
  }

  async fn get_carrier(&self, id: i64) -> Result<Option<Carrier>> {
    let raw: Option<RawCarrier> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT carrier_id, first_name, last_name, born_on, hired_on, login
               FROM carriers WHERE carrier_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawCarrier {
                  carrier_id: row.get(0)?,
                  first_name: row.get(1)?,
                  last_name:  row.get(2)?,
                  born_on:    row.get(3)?,
                  hired_on:   row.get(4)?,
                  login:      row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCarrier::into_carrier).transpose()
  }

  async fn list_carriers(&self) -> Result<Vec<Carrier>> {
    let raws: Vec<RawCarrier> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT carrier_id, first_name, last_name, born_on, hired_on, login
           FROM carriers ORDER BY carrier_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCarrier {
              carrier_id: row.get(0)?,
              first_name: row.get(1)?,
              last_name:  row.get(2)?,
              born_on:    row.get(3)?,
              hired_on:   row.get(4)?,
              login:      row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCarrier::into_carrier).collect()
  }

  async fn find_carrier_by_login(
    &self,
    login: &str,
  ) -> Result<Option<CarrierCredentials>> {
    let login = login.to_owned();

    let raw: Option<(RawCarrier, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT carrier_id, first_name, last_name, born_on, hired_on,
                      login, password_hash
               FROM carriers WHERE login = ?1",
              rusqlite::params![login],
              |row| {
                Ok((
                  RawCarrier {
                    carrier_id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name:  row.get(2)?,
                    born_on:    row.get(3)?,
                    hired_on:   row.get(4)?,
                    login:      row.get(5)?,
                  },
                  row.get::<_, String>(6)?,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(raw, password_hash)| {
        Ok(CarrierCredentials { carrier: raw.into_carrier()?, password_hash })
      })
      .transpose()
  }

  // ── Placement ledger ────────────────────────────────────────────────────

  async fn record_placement(&self, input: NewPlacement) -> Result<Placement> {
    let NewPlacement { carrier_id, package_id, slot_id, deposited_at } = input;
    let at_str = encode_dt(deposited_at.unwrap_or_else(Utc::now));
    let at_cl  = at_str.clone();

    let out: DomainResult<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Err(e) = check_placement_refs(&tx, carrier_id, package_id, slot_id)? {
          return Ok(Err(e));
        }

        tx.execute(
          "INSERT INTO placements (carrier_id, package_id, slot_id, deposited_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![carrier_id, package_id, slot_id, at_cl],
        )?;
        let placement_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(placement_id))
      })
      .await?;

    let placement_id = out.map_err(Error::Core)?;
    RawPlacement {
      placement_id,
      carrier_id,
      package_id,
      slot_id,
      deposited_at: at_str,
    }
    .into_placement()
  }

  async fn assign_package(
    &self,
    carrier_id: i64,
    package_id: i64,
    slot_id: i64,
  ) -> Result<Placement> {
    let at_str = encode_dt(Utc::now());

    let out: DomainResult<RawPlacement> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Err(e) = check_placement_refs(&tx, carrier_id, package_id, slot_id)? {
          return Ok(Err(e));
        }

        // Idempotent short-circuit: already in the target slot.
        if let Some(current) = current_row(&tx, package_id)? {
          if current.slot_id == slot_id {
            return Ok(Ok(current));
          }
        }

        // Exclusivity: a different package currently in the target slot
        // blocks the assignment.
        if let Some(occupant) = current_occupant(&tx, slot_id)?
          && occupant != package_id
        {
          return Ok(Err(CoreError::SlotOccupied { slot_id, occupied_by: occupant }));
        }

        tx.execute(
          "INSERT INTO placements (carrier_id, package_id, slot_id, deposited_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![carrier_id, package_id, slot_id, at_str],
        )?;
        let placement_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Ok(RawPlacement {
          placement_id,
          carrier_id,
          package_id,
          slot_id,
          deposited_at: at_str,
        }))
      })
      .await?;

    out.map_err(Error::Core)?.into_placement()
  }

  async fn remove_placement(
    &self,
    carrier_id: i64,
    package_id: i64,
    slot_id: i64,
  ) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM placements WHERE placement_id = (
             SELECT placement_id FROM placements
             WHERE carrier_id = ?1 AND package_id = ?2 AND slot_id = ?3
             ORDER BY deposited_at DESC, placement_id DESC
             LIMIT 1
           )",
          rusqlite::params![carrier_id, package_id, slot_id],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::Core(CoreError::PlacementNotFound {
        carrier_id,
        package_id,
        slot_id,
      }));
    }
    Ok(())
  }

  async fn current_placement(&self, package_id: i64) -> Result<Option<Placement>> {
    let raw: Option<RawPlacement> = self
      .conn
      .call(move |conn| Ok(current_row(conn, package_id)?))
      .await?;

    raw.map(RawPlacement::into_placement).transpose()
  }

  async fn placement_history(&self, package_id: i64) -> Result<Vec<Placement>> {
    let raws: Vec<RawPlacement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT placement_id, carrier_id, package_id, slot_id, deposited_at
           FROM placements WHERE package_id = ?1
           ORDER BY deposited_at DESC, placement_id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![package_id], map_raw_placement)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlacement::into_placement).collect()
  }

  // ── Reports ─────────────────────────────────────────────────────────────

  async fn slots_with_context(&self) -> Result<Vec<SlotContext>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT s.slot_id, s.level, s.max_volume, s.max_weight, s.column_id,
                  c.number, a.aisle_id, a.number
           FROM slots s
           LEFT JOIN columns c ON c.column_id = s.column_id
           LEFT JOIN aisles  a ON a.aisle_id  = c.aisle_id
           ORDER BY s.slot_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(SlotContext {
              slot_id:       row.get(0)?,
              level:         row.get(1)?,
              max_volume:    row.get(2)?,
              max_weight:    row.get(3)?,
              column_id:     row.get(4)?,
              column_number: row.get(5)?,
              aisle_id:      row.get(6)?,
              aisle_number:  row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn placements_with_details(
    &self,
    include_history: bool,
  ) -> Result<Vec<PlacementDetails>> {
    let raws: Vec<RawPlacementDetails> = self
      .conn
      .call(move |conn| {
        let current_only = if include_history {
          ""
        } else {
          "WHERE p.placement_id = (
             SELECT p2.placement_id FROM placements p2
             WHERE p2.package_id = p.package_id
             ORDER BY p2.deposited_at DESC, p2.placement_id DESC
             LIMIT 1
           )"
        };

        let sql = format!(
          "SELECT p.placement_id, p.carrier_id, p.package_id, p.slot_id,
                  p.deposited_at,
                  s.level, c.number, a.number,
                  k.length, k.width, k.height, k.weight
           FROM placements p
           INNER JOIN packages k ON k.package_id = p.package_id
           LEFT JOIN slots   s ON s.slot_id   = p.slot_id
           LEFT JOIN columns c ON c.column_id = s.column_id
           LEFT JOIN aisles  a ON a.aisle_id  = c.aisle_id
           {current_only}
           ORDER BY p.deposited_at DESC, p.placement_id DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPlacementDetails {
              placement_id:   row.get(0)?,
              carrier_id:     row.get(1)?,
              package_id:     row.get(2)?,
              slot_id:        row.get(3)?,
              deposited_at:   row.get(4)?,
              level:          row.get(5)?,
              column_number:  row.get(6)?,
              aisle_number:   row.get(7)?,
              package_length: row.get(8)?,
              package_width:  row.get(9)?,
              package_height: row.get(10)?,
              package_weight: row.get(11)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlacementDetails::into_details).collect()
  }

  async fn occupancy_of(&self, slot_id: i64) -> Result<Vec<Placement>> {
    let raws: Vec<RawPlacement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.placement_id, p.carrier_id, p.package_id, p.slot_id,
                  p.deposited_at
           FROM placements p
           WHERE p.slot_id = ?1
             AND p.placement_id = (
               SELECT p2.placement_id FROM placements p2
               WHERE p2.package_id = p.package_id
               ORDER BY p2.deposited_at DESC, p2.placement_id DESC
               LIMIT 1
             )
           ORDER BY p.placement_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![slot_id], map_raw_placement)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    if raws.len() > 1 {
      tracing::warn!(
        slot_id,
        occupants = raws.len(),
        "slot holds more than one current placement; ledger integrity suspect"
      );
    }

    raws.into_iter().map(RawPlacement::into_placement).collect()
  }
}

// ─── Connection-level helpers ────────────────────────────────────────────────
//
// These run inside `call` closures, against either the bare connection or an
// open transaction (which derefs to `Connection`).

fn row_exists(
  conn: &rusqlite::Connection,
  sql: &str,
  id: i64,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(sql, rusqlite::params![id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

/// Referential checks shared by `record_placement` and `assign_package`.
fn check_placement_refs(
  conn: &rusqlite::Connection,
  carrier_id: i64,
  package_id: i64,
  slot_id: i64,
) -> rusqlite::Result<DomainResult<()>> {
  if !row_exists(conn, "SELECT 1 FROM packages WHERE package_id = ?1", package_id)? {
    return Ok(Err(CoreError::PackageNotFound(package_id)));
  }
  if !row_exists(conn, "SELECT 1 FROM slots WHERE slot_id = ?1", slot_id)? {
    return Ok(Err(CoreError::SlotNotFound(slot_id)));
  }
  if !row_exists(conn, "SELECT 1 FROM carriers WHERE carrier_id = ?1", carrier_id)? {
    return Ok(Err(CoreError::CarrierNotFound(carrier_id)));
  }
  Ok(Ok(()))
}

fn map_raw_placement(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPlacement> {
  Ok(RawPlacement {
    placement_id: row.get(0)?,
    carrier_id:   row.get(1)?,
    package_id:   row.get(2)?,
    slot_id:      row.get(3)?,
    deposited_at: row.get(4)?,
  })
}

/// The newest ledger row for a package, if any.
fn current_row(
  conn: &rusqlite::Connection,
  package_id: i64,
) -> rusqlite::Result<Option<RawPlacement>> {
  conn
    .query_row(
      "SELECT placement_id, carrier_id, package_id, slot_id, deposited_at
       FROM placements WHERE package_id = ?1
       ORDER BY deposited_at DESC, placement_id DESC
       LIMIT 1",
      rusqlite::params![package_id],
      map_raw_placement,
    )
    .optional()
}

/// The package whose current placement is `slot_id`, if any.
fn current_occupant(
  conn: &rusqlite::Connection,
  slot_id: i64,
) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT p.package_id FROM placements p
       WHERE p.slot_id = ?1
         AND p.placement_id = (
           SELECT p2.placement_id FROM placements p2
           WHERE p2.package_id = p.package_id
           ORDER BY p2.deposited_at DESC, p2.placement_id DESC
           LIMIT 1
         )
       LIMIT 1",
      rusqlite::params![slot_id],
      |row| row.get(0),
    )
    .optional()
}
