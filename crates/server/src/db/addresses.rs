//! Address book repository.
//!
//! "At most one default per (user, kind)" is enforced by clearing sibling
//! defaults inside the same transaction as the write that sets one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use suya_core::{AddressId, AddressKind, UserId};

use super::RepositoryError;
use crate::models::Address;

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: i32,
    kind: String,
    first_name: String,
    last_name: String,
    address_line1: String,
    address_line2: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    phone: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl AddressRow {
    fn into_address(self) -> Result<Address, RepositoryError> {
        let kind: AddressKind = self.kind.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid address kind in database: {e}"))
        })?;

        Ok(Address {
            id: AddressId::new(self.id),
            user_id: UserId::new(self.user_id),
            kind,
            first_name: self.first_name,
            last_name: self.last_name,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            phone: self.phone,
            is_default: self.is_default,
            created_at: self.created_at,
        })
    }
}

const ADDRESS_COLUMNS: &str = "id, user_id, kind, first_name, last_name, address_line1, \
     address_line2, city, state, postal_code, country, phone, is_default, created_at";

/// Fields for a new address-book entry. Required parts are non-optional.
pub struct NewAddress {
    pub kind: AddressKind,
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

/// Partial update; `None` fields are left untouched.
#[derive(Default)]
pub struct AddressPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}

/// Repository for address-book database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's addresses, defaults first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM user_addresses
             WHERE user_id = $1
             ORDER BY is_default DESC, created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AddressRow::into_address).collect()
    }

    /// Create an address; when marked default, clears sibling defaults of the
    /// same kind in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn create(
        &self,
        user_id: UserId,
        new_address: NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if new_address.is_default {
            sqlx::query(
                "UPDATE user_addresses SET is_default = FALSE
                 WHERE user_id = $1 AND kind = $2",
            )
            .bind(user_id.as_i32())
            .bind(new_address.kind.as_str())
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "INSERT INTO user_addresses
                 (user_id, kind, first_name, last_name, address_line1, address_line2,
                  city, state, postal_code, country, phone, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(new_address.kind.as_str())
        .bind(&new_address.first_name)
        .bind(&new_address.last_name)
        .bind(&new_address.address_line1)
        .bind(&new_address.address_line2)
        .bind(&new_address.city)
        .bind(&new_address.state)
        .bind(&new_address.postal_code)
        .bind(&new_address.country)
        .bind(&new_address.phone)
        .bind(new_address.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_address()
    }

    /// Patch an address the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to someone else.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        patch: AddressPatch,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Ownership check doubles as the source of the address kind for
        // sibling-default clearing.
        let kind = sqlx::query_scalar::<_, String>(
            "SELECT kind FROM user_addresses WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if patch.is_default == Some(true) {
            sqlx::query(
                "UPDATE user_addresses SET is_default = FALSE
                 WHERE user_id = $1 AND kind = $2 AND id <> $3",
            )
            .bind(user_id.as_i32())
            .bind(&kind)
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE user_addresses
             SET first_name = COALESCE($3, first_name),
                 last_name = COALESCE($4, last_name),
                 address_line1 = COALESCE($5, address_line1),
                 address_line2 = COALESCE($6, address_line2),
                 city = COALESCE($7, city),
                 state = COALESCE($8, state),
                 postal_code = COALESCE($9, postal_code),
                 country = COALESCE($10, country),
                 phone = COALESCE($11, phone),
                 is_default = COALESCE($12, is_default)
             WHERE id = $1 AND user_id = $2
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.address_line1.as_deref())
        .bind(patch.address_line2.as_deref())
        .bind(patch.city.as_deref())
        .bind(patch.state.as_deref())
        .bind(patch.postal_code.as_deref())
        .bind(patch.country.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_address()
    }

    /// Delete an address the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to someone else.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM user_addresses WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
