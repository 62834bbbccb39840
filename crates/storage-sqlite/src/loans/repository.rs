use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use uangkita_core::errors::PersistError;
use uangkita_core::loans::{InstallmentUpdate, Loan, LoanRepositoryTrait};
use uangkita_core::Result;

use super::model::{loan_from_rows, LoanDB, LoanInstallmentDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{loan_installments, loans};

pub struct LoanRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LoanRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        LoanRepository { pool, writer }
    }

    fn load_loans_impl(&self) -> Result<Vec<Loan>> {
        let mut conn = get_connection(&self.pool)?;

        let loan_rows = loans::table
            .order(loans::created_at.desc())
            .select(LoanDB::as_select())
            .load::<LoanDB>(&mut conn)
            .into_core()?;

        let installment_rows = LoanInstallmentDB::belonging_to(&loan_rows)
            .order((loan_installments::loan_id, loan_installments::sequence.asc()))
            .select(LoanInstallmentDB::as_select())
            .load::<LoanInstallmentDB>(&mut conn)
            .into_core()?
            .grouped_by(&loan_rows);

        loan_rows
            .into_iter()
            .zip(installment_rows)
            .map(|(loan, installments)| loan_from_rows(loan, installments))
            .collect::<std::result::Result<Vec<_>, StorageError>>()
            .into_core()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn persist_loan_create(&self, loan: Loan) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let loan_db = LoanDB::from(&loan);
                let installment_rows: Vec<LoanInstallmentDB> = loan
                    .installments
                    .iter()
                    .map(|installment| LoanInstallmentDB::from_domain(&loan.id, installment))
                    .collect();

                diesel::insert_into(loans::table)
                    .values(&loan_db)
                    .execute(conn)
                    .into_core()?;
                diesel::insert_into(loan_installments::table)
                    .values(&installment_rows)
                    .execute(conn)
                    .into_core()?;

                debug!(
                    "Stored loan {} with {} installments",
                    loan.id,
                    installment_rows.len()
                );
                Ok(())
            })
            .await
    }

    async fn persist_installment_update(
        &self,
        loan_id: String,
        update: InstallmentUpdate,
    ) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(
                    loan_installments::table
                        .filter(loan_installments::loan_id.eq(&loan_id))
                        .filter(loan_installments::id.eq(&update.installment_id)),
                )
                .set((
                    loan_installments::status.eq(update.status.as_str()),
                    loan_installments::payment_date.eq(update.payment_date),
                    loan_installments::proof_reference.eq(update.proof_reference.clone()),
                ))
                .execute(conn)
                .into_core()?;

                if affected == 0 {
                    return Err(PersistError::with_code(
                        format!(
                            "installment {} of loan {} does not exist",
                            update.installment_id, loan_id
                        ),
                        "not_found",
                    )
                    .into());
                }
                Ok(())
            })
            .await
    }

    async fn persist_loan_delete(&self, loan_id: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                // Installments go with the loan through ON DELETE CASCADE.
                let affected = diesel::delete(loans::table.find(loan_id.as_str()))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(PersistError::with_code(
                        format!("loan {} does not exist", loan_id),
                        "not_found",
                    )
                    .into());
                }
                Ok(())
            })
            .await
    }

    async fn fetch_all_loans(&self) -> Result<Vec<Loan>> {
        self.load_loans_impl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use chrono::NaiveDate;
    use diesel::dsl::count_star;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;
    use uangkita_core::errors::Error;
    use uangkita_core::loans::{generate_schedule, InstallmentStatus};

    async fn create_test_repository() -> (
        LoanRepository,
        Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        tempfile::TempDir,
    ) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        (LoanRepository::new(Arc::clone(&pool), writer), pool, temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_loan(id: &str, created_hour: u32) -> Loan {
        Loan {
            id: id.to_string(),
            principal: dec!(10000000),
            annual_rate_percent: dec!(3),
            tenor_months: 10,
            origination_date: date(2024, 1, 1),
            installments: generate_schedule(dec!(10000000), dec!(3), 10, date(2024, 1, 1))
                .unwrap(),
            created_at: date(2024, 1, 1).and_hms_opt(created_hour, 0, 0).unwrap(),
        }
    }

    fn installment_rows(
        pool: &Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    ) -> i64 {
        let mut conn = get_connection(pool).unwrap();
        loan_installments::table
            .select(count_star())
            .first(&mut conn)
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_round_trip() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;
        let older = test_loan("loan-a", 8);
        let newer = test_loan("loan-b", 9);

        repo.persist_loan_create(older.clone()).await.unwrap();
        repo.persist_loan_create(newer.clone()).await.unwrap();

        let loaded = repo.fetch_all_loans().await.unwrap();
        assert_eq!(loaded, vec![newer, older]);
    }

    #[tokio::test]
    async fn test_installment_update_touches_one_row() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;
        let loan = test_loan("loan-a", 8);
        repo.persist_loan_create(loan.clone()).await.unwrap();

        repo.persist_installment_update(
            loan.id.clone(),
            InstallmentUpdate {
                installment_id: "installment-2".to_string(),
                status: InstallmentStatus::Paid,
                payment_date: Some(date(2024, 3, 5)),
                proof_reference: Some("transfer-0305.pdf".to_string()),
            },
        )
        .await
        .unwrap();

        let loaded = repo.fetch_all_loans().await.unwrap().remove(0);
        assert_eq!(loaded.installments[1].status, InstallmentStatus::Paid);
        assert_eq!(loaded.installments[1].payment_date, Some(date(2024, 3, 5)));
        assert_eq!(
            loaded.installments[1].proof_reference.as_deref(),
            Some("transfer-0305.pdf")
        );
        assert_eq!(loaded.installments[0], loan.installments[0]);
        assert_eq!(loaded.installments[2..], loan.installments[2..]);
    }

    #[tokio::test]
    async fn test_unknown_rows_report_not_found() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;

        let err = repo
            .persist_installment_update(
                "missing".to_string(),
                InstallmentUpdate {
                    installment_id: "installment-1".to_string(),
                    status: InstallmentStatus::Paid,
                    payment_date: Some(date(2024, 2, 5)),
                    proof_reference: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Persist(PersistError { code: Some(ref code), .. }) if code == "not_found"
        ));

        assert!(repo.persist_loan_delete("missing".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected_atomically() {
        let (repo, pool, _temp_dir) = create_test_repository().await;
        let loan = test_loan("loan-a", 8);
        repo.persist_loan_create(loan.clone()).await.unwrap();

        let err = repo.persist_loan_create(loan).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Persist(PersistError { code: Some(ref code), .. }) if code == "unique_violation"
        ));
        assert_eq!(installment_rows(&pool), 10);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_installments() {
        let (repo, pool, _temp_dir) = create_test_repository().await;
        repo.persist_loan_create(test_loan("loan-a", 8)).await.unwrap();
        repo.persist_loan_create(test_loan("loan-b", 9)).await.unwrap();
        assert_eq!(installment_rows(&pool), 20);

        repo.persist_loan_delete("loan-a".to_string()).await.unwrap();

        assert_eq!(installment_rows(&pool), 10);
        let remaining: Vec<String> = repo
            .fetch_all_loans()
            .await
            .unwrap()
            .into_iter()
            .map(|loan| loan.id)
            .collect();
        assert_eq!(remaining, vec!["loan-b".to_string()]);
    }
}
