use std::sync::Arc;

use adapter::repository::client::ClientRepositoryImpl;
use adapter::repository::schedule::ScheduleRepositoryImpl;
use adapter::repository::service::ServiceRepositoryImpl;
use adapter::repository::stylist::StylistRepositoryImpl;
use adapter::{
    database::ConnectionPool,
    repository::{health::HealthCheckRepositoryImpl, reservation::ReservationRepositoryImpl},
};
use kernel::repository::client::ClientRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::schedule::ScheduleRepository;
use kernel::repository::service::ServiceRepository;
use kernel::repository::stylist::StylistRepository;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    service_repository: Arc<dyn ServiceRepository>,
    stylist_repository: Arc<dyn StylistRepository>,
    client_repository: Arc<dyn ClientRepository>,
    schedule_repository: Arc<dyn ScheduleRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let service_repository = Arc::new(ServiceRepositoryImpl::new(pool.clone()));
        let stylist_repository = Arc::new(StylistRepositoryImpl::new(pool.clone()));
        let client_repository = Arc::new(ClientRepositoryImpl::new(pool.clone()));
        let schedule_repository = Arc::new(ScheduleRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            reservation_repository,
            service_repository,
            stylist_repository,
            client_repository,
            schedule_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn service_repository(&self) -> Arc<dyn ServiceRepository> {
        self.service_repository.clone()
    }

    pub fn stylist_repository(&self) -> Arc<dyn StylistRepository> {
        self.stylist_repository.clone()
    }

    pub fn client_repository(&self) -> Arc<dyn ClientRepository> {
        self.client_repository.clone()
    }

    pub fn schedule_repository(&self) -> Arc<dyn ScheduleRepository> {
        self.schedule_repository.clone()
    }
}
