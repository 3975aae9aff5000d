use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Engine, EngineError, TagKind, TransactionEvent, TransactionKind, TransactionListFilter,
    TransactionNewCmd, TransactionUpdateCmd, TransferCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn tag(engine: &Engine, name: &str, kind: TagKind) -> Uuid {
    engine
        .new_tag(name, kind, "Utensils", "text-red-500", "bg-red-100", None, Utc::now())
        .await
        .unwrap()
}

async fn assert_identity(engine: &Engine, wallet_id: Uuid) {
    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert!(
        wallet.holds_identity(),
        "wallet {} violates balance identity: {:?}",
        wallet.name,
        wallet
    );
}

#[tokio::test]
async fn expense_lifecycle_keeps_wallet_consistent() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine
        .new_wallet("Cash", 5_000_000, Utc::now())
        .await
        .unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    let tx_id = engine
        .add_transaction(
            TransactionNewCmd::new(wallet_id, food, TransactionKind::Expense, 50_000, Utc::now())
                .description("lunch"),
        )
        .await
        .unwrap();

    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 4_950_000);
    assert_eq!(wallet.total_expense, 50_000);
    assert_eq!(wallet.total_income, 0);

    engine
        .update_transaction(tx_id, TransactionUpdateCmd::new().amount(80_000))
        .await
        .unwrap();

    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 4_920_000);
    assert_eq!(wallet.total_expense, 80_000);
    assert_identity(&engine, wallet_id).await;

    assert!(engine.delete_transaction(tx_id).await.unwrap());

    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 5_000_000);
    assert_eq!(wallet.total_expense, 0);
    assert_identity(&engine, wallet_id).await;
}

#[tokio::test]
async fn deleting_twice_is_a_noop_the_second_time() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine.new_wallet("Cash", 1_000, Utc::now()).await.unwrap();
    let salary = tag(&engine, "Salary", TagKind::Income).await;

    let tx_id = engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            salary,
            TransactionKind::Income,
            500,
            Utc::now(),
        ))
        .await
        .unwrap();

    assert!(engine.delete_transaction(tx_id).await.unwrap());
    let after_first = engine.wallet(wallet_id).await.unwrap();

    assert!(!engine.delete_transaction(tx_id).await.unwrap());
    let after_second = engine.wallet(wallet_id).await.unwrap();

    assert_eq!(after_first.balance, 1_000);
    assert_eq!(after_first.balance, after_second.balance);
    assert_eq!(after_first.total_income, after_second.total_income);
    assert_eq!(after_first.total_expense, after_second.total_expense);
}

#[tokio::test]
async fn zero_amount_is_rejected_and_totals_untouched() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine
        .new_wallet("Cash", 5_000_000, Utc::now())
        .await
        .unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    let err = engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            food,
            TransactionKind::Expense,
            0,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("amount must be > 0".to_string())
    );

    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 5_000_000);
    assert_eq!(wallet.total_expense, 0);
    let txs = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn missing_wallet_or_tag_is_rejected_before_any_write() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine.new_wallet("Cash", 0, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    let err = engine
        .add_transaction(TransactionNewCmd::new(
            Uuid::new_v4(),
            food,
            TransactionKind::Expense,
            100,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingReference(_)));

    let err = engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            Uuid::new_v4(),
            TransactionKind::Expense,
            100,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingReference(_)));

    let txs = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn transfer_and_its_deletion_leave_no_residue() {
    let (engine, _db) = engine_with_db().await;
    let wallet_a = engine
        .new_wallet("A", 1_000_000, Utc::now())
        .await
        .unwrap();
    let wallet_b = engine.new_wallet("B", 0, Utc::now()).await.unwrap();
    let transfer_out = tag(&engine, "Transfer out", TagKind::Expense).await;
    let transfer_in = tag(&engine, "Transfer in", TagKind::Income).await;

    let (expense_id, income_id) = engine
        .create_transfer(
            TransferCmd::new(200_000, wallet_a, wallet_b, transfer_out, transfer_in, Utc::now())
                .description("to savings"),
        )
        .await
        .unwrap();

    let a = engine.wallet(wallet_a).await.unwrap();
    let b = engine.wallet(wallet_b).await.unwrap();
    assert_eq!(a.balance, 800_000);
    assert_eq!(b.balance, 200_000);
    assert_identity(&engine, wallet_a).await;
    assert_identity(&engine, wallet_b).await;

    let expense_leg = engine.transaction(expense_id).await.unwrap();
    assert_eq!(expense_leg.peer_wallet_id, Some(wallet_b));
    let income_leg = engine.transaction(income_id).await.unwrap();
    assert_eq!(income_leg.peer_wallet_id, Some(wallet_a));

    let deletion = engine.delete_transfer(expense_id).await.unwrap();
    assert!(!deletion.orphaned);
    assert_eq!(deletion.deleted.len(), 2);

    let a = engine.wallet(wallet_a).await.unwrap();
    let b = engine.wallet(wallet_b).await.unwrap();
    assert_eq!(a.balance, 1_000_000);
    assert_eq!(b.balance, 0);

    for wallet_id in [wallet_a, wallet_b] {
        let txs = engine
            .list_transactions(TransactionListFilter {
                wallet_id: Some(wallet_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(txs.is_empty());
    }
}

#[tokio::test]
async fn transfer_to_same_wallet_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let wallet_a = engine.new_wallet("A", 1_000, Utc::now()).await.unwrap();
    let out_tag = tag(&engine, "Out", TagKind::Expense).await;
    let in_tag = tag(&engine, "In", TagKind::Income).await;

    let err = engine
        .create_transfer(TransferCmd::new(
            100, wallet_a, wallet_a, out_tag, in_tag, Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransfer(_)));
}

#[tokio::test]
async fn deleting_a_transaction_routes_transfer_legs_through_the_pair() {
    let (engine, _db) = engine_with_db().await;
    let wallet_a = engine.new_wallet("A", 500, Utc::now()).await.unwrap();
    let wallet_b = engine.new_wallet("B", 0, Utc::now()).await.unwrap();
    let out_tag = tag(&engine, "Out", TagKind::Expense).await;
    let in_tag = tag(&engine, "In", TagKind::Income).await;

    let (_, income_id) = engine
        .create_transfer(TransferCmd::new(
            300, wallet_a, wallet_b, out_tag, in_tag, Utc::now(),
        ))
        .await
        .unwrap();

    // Plain delete on one leg must still take the pair down.
    assert!(engine.delete_transaction(income_id).await.unwrap());

    let txs = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
    assert_eq!(engine.wallet(wallet_a).await.unwrap().balance, 500);
    assert_eq!(engine.wallet(wallet_b).await.unwrap().balance, 0);
}

#[tokio::test]
async fn orphaned_transfer_leg_is_deleted_and_reported() {
    let (engine, _db) = engine_with_db().await;
    let wallet_a = engine.new_wallet("A", 500, Utc::now()).await.unwrap();
    let wallet_b = engine.new_wallet("B", 0, Utc::now()).await.unwrap();
    let out_tag = tag(&engine, "Out", TagKind::Expense).await;
    let in_tag = tag(&engine, "In", TagKind::Income).await;

    let (expense_id, income_id) = engine
        .create_transfer(TransferCmd::new(
            200, wallet_a, wallet_b, out_tag, in_tag, Utc::now(),
        ))
        .await
        .unwrap();

    // Rip out the income leg at the store level, leaving its wallet stale,
    // the shape a prior partial failure leaves behind.
    engine
        .bulk_delete_transactions(&[income_id])
        .await
        .unwrap();

    let deletion = engine.delete_transfer(expense_id).await.unwrap();
    assert!(deletion.orphaned);
    assert_eq!(deletion.deleted, vec![expense_id]);

    // The found leg's wallet is reverted; the orphaned side is untouched
    // until reconciliation.
    assert_eq!(engine.wallet(wallet_a).await.unwrap().balance, 500);
    assert_eq!(engine.wallet(wallet_b).await.unwrap().balance, 200);

    engine.recompute_balances().await.unwrap();
    assert_eq!(engine.wallet(wallet_b).await.unwrap().balance, 0);
}

#[tokio::test]
async fn wallet_reassignment_event_equals_delete_then_create() {
    // Path 1: a write event that moves the transaction between wallets.
    let (engine, _db) = engine_with_db().await;
    let wallet_a = engine.new_wallet("A", 10_000, Utc::now()).await.unwrap();
    let wallet_b = engine.new_wallet("B", 2_000, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    let tx_id = engine
        .add_transaction(TransactionNewCmd::new(
            wallet_a,
            food,
            TransactionKind::Expense,
            1_500,
            Utc::now(),
        ))
        .await
        .unwrap();

    let before = engine.transaction(tx_id).await.unwrap();
    let mut after = before.clone();
    after.wallet_id = wallet_b;
    after.amount = 2_500;
    engine
        .apply_transaction_event(TransactionEvent::updated(before.clone(), after.clone()))
        .await
        .unwrap();

    let event_a = engine.wallet(wallet_a).await.unwrap();
    let event_b = engine.wallet(wallet_b).await.unwrap();

    // Path 2: the same outcome as two independent operations.
    let (engine2, _db2) = engine_with_db().await;
    let wallet_a2 = engine2.new_wallet("A", 10_000, Utc::now()).await.unwrap();
    let wallet_b2 = engine2.new_wallet("B", 2_000, Utc::now()).await.unwrap();
    let food2 = tag(&engine2, "Food", TagKind::Expense).await;

    let tx2 = engine2
        .add_transaction(TransactionNewCmd::new(
            wallet_a2,
            food2,
            TransactionKind::Expense,
            1_500,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine2.delete_transaction(tx2).await.unwrap();
    engine2
        .add_transaction(TransactionNewCmd::new(
            wallet_b2,
            food2,
            TransactionKind::Expense,
            2_500,
            Utc::now(),
        ))
        .await
        .unwrap();

    let split_a = engine2.wallet(wallet_a2).await.unwrap();
    let split_b = engine2.wallet(wallet_b2).await.unwrap();

    assert_eq!(event_a.balance, split_a.balance);
    assert_eq!(event_a.total_expense, split_a.total_expense);
    assert_eq!(event_b.balance, split_b.balance);
    assert_eq!(event_b.total_expense, split_b.total_expense);
}

#[tokio::test]
async fn empty_write_event_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let empty = engine
        .apply_transaction_event(TransactionEvent {
            before: None,
            after: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(empty, EngineError::MissingPriorState(_)));
}

#[tokio::test]
async fn event_for_unknown_wallet_surfaces_missing_reference() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine.new_wallet("Cash", 0, Utc::now()).await.unwrap();
    let salary = tag(&engine, "Salary", TagKind::Income).await;

    let tx_id = engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            salary,
            TransactionKind::Income,
            700,
            Utc::now(),
        ))
        .await
        .unwrap();
    let mut ghost = engine.transaction(tx_id).await.unwrap();
    ghost.wallet_id = Uuid::new_v4();
    ghost.id = Uuid::new_v4();

    let err = engine
        .apply_transaction_event(TransactionEvent::created(ghost))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingReference(_)));
}

#[tokio::test]
async fn last_wallet_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let only = engine.new_wallet("Only", 0, Utc::now()).await.unwrap();

    let err = engine.delete_wallet(only).await.unwrap_err();
    assert!(matches!(err, EngineError::LastWallet(_)));
    assert_eq!(engine.list_wallets().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_wallet_cascades_to_its_transactions() {
    let (engine, _db) = engine_with_db().await;
    let _keep = engine.new_wallet("Keep", 0, Utc::now()).await.unwrap();
    let doomed = engine.new_wallet("Drop", 9_000, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    for amount in [100, 200, 300] {
        engine
            .add_transaction(TransactionNewCmd::new(
                doomed,
                food,
                TransactionKind::Expense,
                amount,
                Utc::now(),
            ))
            .await
            .unwrap();
    }

    engine.delete_wallet(doomed).await.unwrap();

    assert!(matches!(
        engine.wallet(doomed).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    let txs = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn recompute_restores_corrupted_denormalized_totals() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();

    let wallet_id = engine
        .new_wallet("Cash", 1_000_000, Utc::now())
        .await
        .unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;
    let salary = tag(&engine, "Salary", TagKind::Income).await;

    engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            salary,
            TransactionKind::Income,
            250_000,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            food,
            TransactionKind::Expense,
            40_000,
            Utc::now(),
        ))
        .await
        .unwrap();

    let expected = engine.wallet(wallet_id).await.unwrap();

    // Corrupt the denormalized columns directly in the store.
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE wallets SET balance = ?, total_income = ?, total_expense = ? WHERE id = ?;",
        vec![
            999i64.into(),
            999i64.into(),
            999i64.into(),
            wallet_id.to_string().into(),
        ],
    ))
    .await
    .unwrap();

    engine.recompute_balances().await.unwrap();

    let recomputed = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(recomputed.balance, expected.balance);
    assert_eq!(recomputed.total_income, expected.total_income);
    assert_eq!(recomputed.total_expense, expected.total_expense);
    assert_eq!(recomputed.balance, 1_210_000);
}

#[tokio::test]
async fn reconciliation_matches_incremental_application_in_any_order() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine.new_wallet("Cash", 5_000, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;
    let salary = tag(&engine, "Salary", TagKind::Income).await;

    let amounts = [
        (TransactionKind::Income, salary, 900),
        (TransactionKind::Expense, food, 150),
        (TransactionKind::Income, salary, 60),
        (TransactionKind::Expense, food, 410),
    ];
    for (kind, tag_id, amount) in amounts {
        engine
            .add_transaction(TransactionNewCmd::new(
                wallet_id,
                tag_id,
                kind,
                amount,
                Utc::now(),
            ))
            .await
            .unwrap();
    }
    let incremental = engine.wallet(wallet_id).await.unwrap();

    engine.recompute_balances().await.unwrap();
    let recomputed = engine.wallet(wallet_id).await.unwrap();

    assert_eq!(incremental.balance, recomputed.balance);
    assert_eq!(incremental.total_income, recomputed.total_income);
    assert_eq!(incremental.total_expense, recomputed.total_expense);
    assert_eq!(recomputed.balance, 5_000 + 960 - 560);
}

#[tokio::test]
async fn legacy_wallet_rows_normalize_on_first_projection() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();

    let wallet_id = engine.new_wallet("Old", 7_000, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    // Simulate a row that predates the derived columns.
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE wallets SET balance = NULL, total_income = NULL, total_expense = NULL WHERE id = ?;",
        vec![wallet_id.to_string().into()],
    ))
    .await
    .unwrap();

    engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            food,
            TransactionKind::Expense,
            1_000,
            Utc::now(),
        ))
        .await
        .unwrap();

    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, 6_000);
    assert_eq!(wallet.total_expense, 1_000);
    assert!(wallet.holds_identity());
}

#[tokio::test]
async fn tag_rules_are_enforced() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine.new_wallet("Cash", 0, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;

    let err = engine
        .update_tag(food, Some(TagKind::Income), Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ImmutableField(_)));

    engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            food,
            TransactionKind::Expense,
            75,
            Utc::now(),
        ))
        .await
        .unwrap();

    let err = engine.delete_tag(food).await.unwrap_err();
    assert_eq!(err, EngineError::TagInUse("Food".to_string()));
    assert_eq!(engine.tag_spent(food).await.unwrap(), 75);
}

#[tokio::test]
async fn transfer_leg_amount_cannot_change_alone() {
    let (engine, _db) = engine_with_db().await;
    let wallet_a = engine.new_wallet("A", 1_000, Utc::now()).await.unwrap();
    let wallet_b = engine.new_wallet("B", 0, Utc::now()).await.unwrap();
    let out_tag = tag(&engine, "Out", TagKind::Expense).await;
    let in_tag = tag(&engine, "In", TagKind::Income).await;

    let (expense_id, _) = engine
        .create_transfer(TransferCmd::new(
            400, wallet_a, wallet_b, out_tag, in_tag, Utc::now(),
        ))
        .await
        .unwrap();

    let err = engine
        .update_transaction(expense_id, TransactionUpdateCmd::new().amount(500))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ImmutableField(_)));

    // Metadata edits on a leg are fine.
    engine
        .update_transaction(
            expense_id,
            TransactionUpdateCmd::new().description("monthly savings"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn import_remaps_ids_skips_bad_records_and_folds_totals() {
    let (engine, _db) = engine_with_db().await;

    let snapshot: engine::Snapshot = serde_json::from_value(serde_json::json!({
        "wallets": [
            { "id": "w-1", "name": "Cash", "initialBalance": 1_000_000.0,
              "balance": 123.0, "totalIncome": 4.0, "totalExpense": 5.0 },
            { "id": "w-2", "name": "Bank", "initialBalance": 0.0 }
        ],
        "tags": [
            { "id": "t-1", "name": "Food", "type": "expense" },
            { "id": "t-2", "name": "Salary", "type": "income" },
            { "id": "t-3", "name": "Broken", "type": "mystery" }
        ],
        "transactions": [
            { "walletId": "w-1", "tagId": "t-1", "type": "expense", "amount": 50_000.0,
              "description": "groceries", "createdAt": "2024-05-01T10:00:00Z" },
            { "walletId": "w-1", "tagId": "t-2", "type": "income", "amount": 250_000.0,
              "description": "salary", "createdAt": { "seconds": 1714550400, "nanoseconds": 0 } },
            { "walletId": "w-2", "tagId": "t-2", "type": "income", "amount": 80_000.0,
              "description": "bonus", "createdAt": "not-a-date" },
            { "walletId": "w-9", "tagId": "t-1", "type": "expense", "amount": 10.0,
              "description": "dangling wallet", "createdAt": "2024-05-01T10:00:00Z" },
            { "walletId": "w-2", "tagId": "t-1", "type": "expense", "amount": 0.0,
              "description": "zero amount", "createdAt": "2024-05-01T10:00:00Z" }
        ]
    }))
    .unwrap();

    let report = engine.import_snapshot(snapshot).await.unwrap();
    assert_eq!(report.wallets, 2);
    assert_eq!(report.tags, 2);
    assert_eq!(report.transactions, 2);
    // Broken tag kind, bad date, dangling wallet, zero amount.
    assert_eq!(report.skipped.len(), 4);

    let wallets = engine.list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 2);
    let cash = wallets.iter().find(|w| w.name == "Cash").unwrap();
    // Imported totals fields are ignored; the fold decides.
    assert_eq!(cash.balance, 1_000_000 + 250_000 - 50_000);
    assert_eq!(cash.total_income, 250_000);
    assert_eq!(cash.total_expense, 50_000);
    assert!(cash.holds_identity());

    let bank = wallets.iter().find(|w| w.name == "Bank").unwrap();
    assert_eq!(bank.balance, 0);

    // Foreign keys were rewritten to the fresh ids.
    let txs = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert!(txs.iter().all(|t| t.wallet_id == cash.id));
}

#[tokio::test]
async fn export_then_import_round_trips_the_ledger() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine
        .new_wallet("Cash", 300_000, Utc::now())
        .await
        .unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;
    engine
        .add_transaction(
            TransactionNewCmd::new(wallet_id, food, TransactionKind::Expense, 45_000, Utc::now())
                .description("dinner"),
        )
        .await
        .unwrap();

    let exported = engine.export_snapshot().await.unwrap();

    let (other, _db2) = engine_with_db().await;
    let report = other.import_snapshot(exported).await.unwrap();
    assert!(report.skipped.is_empty());

    let wallets = other.list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].balance, 255_000);
    assert_eq!(wallets[0].total_expense, 45_000);
    assert!(wallets[0].holds_identity());
}

#[tokio::test]
async fn clear_all_empties_the_store() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = engine.new_wallet("Cash", 100, Utc::now()).await.unwrap();
    let food = tag(&engine, "Food", TagKind::Expense).await;
    engine
        .add_transaction(TransactionNewCmd::new(
            wallet_id,
            food,
            TransactionKind::Expense,
            10,
            Utc::now(),
        ))
        .await
        .unwrap();

    engine.clear_all().await.unwrap();

    assert!(engine.list_wallets().await.unwrap().is_empty());
    assert!(engine.list_tags().await.unwrap().is_empty());
    assert!(
        engine
            .list_transactions(TransactionListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn overview_sums_all_wallets() {
    let (engine, _db) = engine_with_db().await;
    let a = engine.new_wallet("A", 1_000, Utc::now()).await.unwrap();
    let b = engine.new_wallet("B", 500, Utc::now()).await.unwrap();
    let salary = tag(&engine, "Salary", TagKind::Income).await;

    engine
        .add_transaction(TransactionNewCmd::new(
            a,
            salary,
            TransactionKind::Income,
            200,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .add_transaction(TransactionNewCmd::new(
            b,
            salary,
            TransactionKind::Income,
            300,
            Utc::now(),
        ))
        .await
        .unwrap();

    let overview = engine.overview().await.unwrap();
    assert_eq!(overview.balance, 2_000);
    assert_eq!(overview.total_income, 500);
    assert_eq!(overview.total_expense, 0);
}
