//! Order submission demo showing the happy and the compensated path.
//!
//! Run with: cargo run --example order

use std::time::Duration;

use async_trait::async_trait;
use reversible::{compose, execute, spawn, Action, Composite};
use thiserror::Error;

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, Clone, Error)]
enum OrderError {
    #[error("payment failed: {0}")]
    PaymentFailed(String),
    #[error("inventory unavailable")]
    InventoryUnavailable,
}

// ============================================================================
// Action implementations
// ============================================================================

/// Step 1: create the order record.
struct CreateOrder {
    customer: String,
    order_id: Option<String>,
}

impl CreateOrder {
    fn new(customer: &str) -> Self {
        Self {
            customer: customer.to_string(),
            order_id: None,
        }
    }
}

#[async_trait]
impl Action for CreateOrder {
    type Output = String;
    type Error = OrderError;

    async fn forwards(&mut self) -> Result<String, OrderError> {
        println!("  [CreateOrder] creating order for {}", self.customer);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let id = format!("ORD-{}-001", self.customer);
        self.order_id = Some(id.clone());
        println!("  [CreateOrder] order created: {}", id);
        Ok(id)
    }

    async fn backwards(&mut self) -> Result<(), OrderError> {
        // order_id is None if creation never completed
        if let Some(id) = self.order_id.take() {
            println!("  [CreateOrder] COMPENSATING - canceling {}", id);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        Ok(())
    }
}

/// Step 2: reserve inventory.
struct ReserveInventory {
    quantity: u32,
    reserved: bool,
}

impl ReserveInventory {
    fn new(quantity: u32) -> Self {
        Self {
            quantity,
            reserved: false,
        }
    }
}

#[async_trait]
impl Action for ReserveInventory {
    type Output = ();
    type Error = OrderError;

    async fn forwards(&mut self) -> Result<(), OrderError> {
        println!("  [ReserveInventory] reserving {} items", self.quantity);
        tokio::time::sleep(Duration::from_millis(150)).await;

        if self.quantity > 100 {
            println!("  [ReserveInventory] FAILED - not enough inventory");
            return Err(OrderError::InventoryUnavailable);
        }

        self.reserved = true;
        Ok(())
    }

    async fn backwards(&mut self) -> Result<(), OrderError> {
        if self.reserved {
            println!(
                "  [ReserveInventory] COMPENSATING - releasing {} items",
                self.quantity
            );
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.reserved = false;
        }
        Ok(())
    }
}

/// Step 3: charge the payment.
struct ChargePayment {
    order_id: String,
    amount: f64,
    decline: bool,
    payment_id: Option<String>,
}

impl ChargePayment {
    fn new(order_id: &str, amount: f64, decline: bool) -> Self {
        Self {
            order_id: order_id.to_string(),
            amount,
            decline,
            payment_id: None,
        }
    }
}

#[async_trait]
impl Action for ChargePayment {
    type Output = String;
    type Error = OrderError;

    async fn forwards(&mut self) -> Result<String, OrderError> {
        println!("  [ChargePayment] charging ${:.2}", self.amount);
        tokio::time::sleep(Duration::from_millis(200)).await;

        if self.decline {
            println!("  [ChargePayment] FAILED - card declined");
            return Err(OrderError::PaymentFailed("card declined".to_string()));
        }

        let id = format!("PAY-{}", self.order_id);
        self.payment_id = Some(id.clone());
        println!("  [ChargePayment] payment accepted: {}", id);
        Ok(id)
    }

    async fn backwards(&mut self) -> Result<(), OrderError> {
        if let Some(id) = self.payment_id.take() {
            println!(
                "  [ChargePayment] COMPENSATING - refunding ${:.2} ({})",
                self.amount, id
            );
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Ok(())
    }
}

/// Step 4: send the receipt.
struct SendReceipt {
    email: String,
    sent: bool,
}

impl SendReceipt {
    fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            sent: false,
        }
    }
}

#[async_trait]
impl Action for SendReceipt {
    type Output = ();
    type Error = OrderError;

    async fn forwards(&mut self) -> Result<(), OrderError> {
        println!("  [SendReceipt] sending receipt to {}", self.email);
        tokio::time::sleep(Duration::from_millis(100)).await;

        self.sent = true;
        Ok(())
    }

    async fn backwards(&mut self) -> Result<(), OrderError> {
        if self.sent {
            println!(
                "  [SendReceipt] COMPENSATING - sending cancellation to {}",
                self.email
            );
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.sent = false;
        }
        Ok(())
    }
}

// ============================================================================
// The chain
// ============================================================================

fn submit_order(customer: &str, quantity: u32, decline: bool) -> Composite<String, OrderError> {
    let customer = customer.to_string();
    compose(move |chain| async move {
        let order_id = chain.run(CreateOrder::new(&customer)).await?;
        chain.run(ReserveInventory::new(quantity)).await?;
        chain
            .run(ChargePayment::new(&order_id, 99.99, decline))
            .await?;
        chain.run(SendReceipt::new("customer@example.com")).await?;
        Ok(order_id)
    })
}

// ============================================================================
// Demo scenarios
// ============================================================================

#[tokio::main]
async fn main() {
    println!("=== Scenario 1: happy path ===\n");
    match execute(submit_order("CUST-123", 5, false)).await {
        Ok(order_id) => println!("\n  order completed: {}\n", order_id),
        Err(err) => println!("\n  order failed: {}\n", err),
    }

    println!("=== Scenario 2: declined payment triggers compensation ===\n");
    match execute(submit_order("CUST-456", 5, true)).await {
        Ok(order_id) => println!("\n  order completed: {}\n", order_id),
        Err(err) => println!("\n  order failed after compensation: {}\n", err),
    }

    println!("=== Scenario 3: independent submissions on their own tasks ===\n");
    let first = spawn(submit_order("CUST-789", 3, false));
    let second = spawn(submit_order("CUST-790", 7, false));
    let (first, second) = tokio::join!(first, second);
    println!("\n  first: {:?}", first.map_err(|e| e.to_string()));
    println!("  second: {:?}\n", second.map_err(|e| e.to_string()));
}
