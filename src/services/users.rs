//! Account service: person administration, login and person bulk I/O.

use std::path::Path;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    exchange::{binary, text},
    models::{
        import_report::ImportReport,
        person::{Person, PersonKind, Role},
    },
    repository::Repository,
};

/// Account seeded into an empty person table at startup.
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Check a username/secret pair against one role partition.
    pub async fn login(&self, username: &str, password: &str, role: Role) -> AppResult<bool> {
        match self.repository.persons.find_by_role(username, role).await? {
            Some(person) => self.verify_password(&person, password),
            None => Ok(false),
        }
    }

    fn verify_password(&self, person: &Person, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&person.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Imported snapshots may carry credentials that are already PHC
    /// hashes; those pass through unchanged, everything else is hashed
    /// before it reaches the store.
    fn ensure_hashed(&self, secret: &str) -> AppResult<String> {
        if PasswordHash::new(secret).is_ok() {
            Ok(secret.to_string())
        } else {
            self.hash_password(secret)
        }
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Create a regular user account. The username must be free in both
    /// role partitions.
    pub async fn create_user(
        &self,
        username: &str,
        full_name: &str,
        password: &str,
    ) -> AppResult<Person> {
        self.create(Person {
            username: username.to_string(),
            full_name: full_name.to_string(),
            password: self.ensure_hashed(password)?,
            kind: PersonKind::User,
        })
        .await
    }

    /// Create a librarian account.
    pub async fn create_librarian(
        &self,
        username: &str,
        full_name: &str,
        password: &str,
        salary: i32,
    ) -> AppResult<Person> {
        self.create(Person {
            username: username.to_string(),
            full_name: full_name.to_string(),
            password: self.ensure_hashed(password)?,
            kind: PersonKind::Librarian { salary },
        })
        .await
    }

    async fn create(&self, person: Person) -> AppResult<Person> {
        self.repository.persons.create(&person).await?;
        tracing::info!(username = %person.username, role = %person.kind.role(), "person created");
        Ok(person)
    }

    /// Replace a user's full name and credential; the username never
    /// changes. Pass the stored credential back to keep it.
    pub async fn update_user(
        &self,
        username: &str,
        full_name: &str,
        password: &str,
    ) -> AppResult<()> {
        let person = Person {
            username: username.to_string(),
            full_name: full_name.to_string(),
            password: self.ensure_hashed(password)?,
            kind: PersonKind::User,
        };
        if !self.repository.persons.update(&person).await? {
            return Err(AppError::NotFound(format!("User {} not found", username)));
        }
        Ok(())
    }

    /// Replace a librarian's full name, credential and salary.
    pub async fn update_librarian(
        &self,
        username: &str,
        full_name: &str,
        password: &str,
        salary: i32,
    ) -> AppResult<()> {
        let person = Person {
            username: username.to_string(),
            full_name: full_name.to_string(),
            password: self.ensure_hashed(password)?,
            kind: PersonKind::Librarian { salary },
        };
        if !self.repository.persons.update(&person).await? {
            return Err(AppError::NotFound(format!(
                "Librarian {} not found",
                username
            )));
        }
        Ok(())
    }

    pub async fn delete_user(&self, username: &str) -> AppResult<()> {
        if !self.repository.persons.delete(username, Role::User).await? {
            return Err(AppError::NotFound(format!("User {} not found", username)));
        }
        Ok(())
    }

    pub async fn delete_librarian(&self, username: &str) -> AppResult<()> {
        if !self
            .repository
            .persons
            .delete(username, Role::Librarian)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "Librarian {} not found",
                username
            )));
        }
        Ok(())
    }

    pub async fn get_user(&self, username: &str) -> AppResult<Option<Person>> {
        self.repository
            .persons
            .find_by_role(username, Role::User)
            .await
    }

    pub async fn list_users(&self) -> AppResult<Vec<Person>> {
        self.repository.persons.list_by_role(Role::User).await
    }

    pub async fn list_librarians(&self) -> AppResult<Vec<Person>> {
        self.repository.persons.list_by_role(Role::Librarian).await
    }

    /// Seed the default librarian account when the person table is empty.
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        if self.repository.persons.count().await? == 0 {
            self.create_librarian(
                DEFAULT_ADMIN_USERNAME,
                "Administrator",
                DEFAULT_ADMIN_PASSWORD,
                0,
            )
            .await?;
            tracing::info!("seeded default librarian account");
        }
        Ok(())
    }

    // =========================================================================
    // Bulk import / export (user accounts, as in the source system)
    // =========================================================================

    /// Import a binary person snapshot, merging it into the store.
    pub async fn import_users_bin(&self, path: impl AsRef<Path>) -> AppResult<ImportReport> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let persons = binary::decode_persons(&bytes)?;

        let mut report = ImportReport::default();
        for person in persons {
            self.reconcile_person(person, &mut report).await?;
        }

        tracing::info!(path = %path.as_ref().display(), %report, "binary user import finished");
        Ok(report)
    }

    /// Import user accounts from delimited text. A malformed row aborts
    /// the rest of the file; rows reconciled before it stay in the store.
    pub async fn import_users_text(&self, path: impl AsRef<Path>) -> AppResult<ImportReport> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;

        let mut report = ImportReport::default();
        // First line is the header.
        for (idx, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let (username, full_name, password) = text::parse_user_row(idx + 1, line)?;
            self.reconcile_person(
                Person {
                    username,
                    full_name,
                    password,
                    kind: PersonKind::User,
                },
                &mut report,
            )
            .await?;
        }

        tracing::info!(path = %path.as_ref().display(), %report, "text user import finished");
        Ok(report)
    }

    /// Export all user accounts as a binary snapshot. Returns the number
    /// of records written.
    pub async fn export_users_bin(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let users = self.repository.persons.list_by_role(Role::User).await?;
        let bytes = binary::encode_persons(&users)?;
        tokio::fs::write(path.as_ref(), bytes).await?;

        tracing::info!(path = %path.as_ref().display(), count = users.len(), "binary user export finished");
        Ok(users.len())
    }

    /// Export user accounts as delimited text without credentials.
    pub async fn export_users_text(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let users = self.repository.persons.list_by_role(Role::User).await?;

        let mut out = String::from(text::USERS_HEADER);
        out.push('\n');
        for user in &users {
            out.push_str(&text::user_row(user));
            out.push('\n');
        }
        tokio::fs::write(path.as_ref(), out).await?;

        tracing::info!(path = %path.as_ref().display(), count = users.len(), "text user export finished");
        Ok(users.len())
    }

    /// Export user accounts including the stored credential. This form
    /// carries no header, unlike [`export_users_text`](Self::export_users_text);
    /// both historical export paths are kept as separate operations.
    pub async fn export_users_text_with_credentials(
        &self,
        path: impl AsRef<Path>,
    ) -> AppResult<usize> {
        let users = self.repository.persons.list_by_role(Role::User).await?;

        let mut out = String::new();
        for user in &users {
            out.push_str(&text::user_row_with_credentials(user));
            out.push('\n');
        }
        tokio::fs::write(path.as_ref(), out).await?;

        tracing::info!(path = %path.as_ref().display(), count = users.len(), "credential user export finished");
        Ok(users.len())
    }

    /// One reconciliation step: create when the username is unknown in
    /// either role, leave the stored account untouched when it is not.
    async fn reconcile_person(
        &self,
        mut person: Person,
        report: &mut ImportReport,
    ) -> AppResult<()> {
        if self
            .repository
            .persons
            .username_exists(&person.username)
            .await?
        {
            report.record_skipped();
            return Ok(());
        }

        person.password = self.ensure_hashed(&person.password)?;
        self.repository.persons.create(&person).await?;
        report.record_added();
        Ok(())
    }
}
