use serde::Serialize;

use crate::domain::access::{ADMIN_ONLY, authorize};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::repository::{CustomerReader, OrderReader};
use crate::services::ServiceResult;

/// Number of orders listed in the "recent orders" table.
pub const RECENT_ORDERS_LIMIT: i64 = 5;

/// Headline counters shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_customers: usize,
    pub total_orders: usize,
    pub orders_delivered: usize,
    pub orders_pending: usize,
}

/// Data required to render the dashboard template.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    pub stats: DashboardStats,
    pub customers: Vec<Customer>,
    pub recent_orders: Vec<Order>,
}

/// Collects the admin dashboard counters, customers and most recent orders.
pub fn load_dashboard<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
) -> ServiceResult<DashboardPageData>
where
    R: CustomerReader + OrderReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let stats = DashboardStats {
        total_customers: repo.count_customers()?,
        total_orders: repo.count_orders(OrderListQuery::new())?,
        orders_delivered: repo.count_orders(OrderListQuery::new().status(OrderStatus::Delivered))?,
        orders_pending: repo.count_orders(OrderListQuery::new().status(OrderStatus::Pending))?,
    };

    let customers = repo.list_customers()?;
    let recent_orders = repo.list_orders(OrderListQuery::new().limit(RECENT_ORDERS_LIMIT))?;

    Ok(DashboardPageData {
        stats,
        customers,
        recent_orders,
    })
}
