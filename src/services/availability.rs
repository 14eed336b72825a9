// src/services/availability.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, Postgres};

use crate::{
    common::{error::AppError, timezone},
    db::ReservationRepository,
    models::reservation::{Reservation, ReservationStatus, TimeSlot},
};

// Grade de referência: 24 meias-horas, de 10:00 a 21:30 inclusive.
const GRID_START_HOUR: u32 = 10;
const GRID_SLOTS: usize = 24;

/// As marcas fixas da grade, na hora civil da franquia.
pub fn reference_grid() -> Vec<NaiveTime> {
    (0..GRID_SLOTS)
        .map(|i| {
            let hour = GRID_START_HOUR + (i as u32) / 2;
            let minute = if i % 2 == 0 { 0 } else { 30 };
            NaiveTime::from_hms_opt(hour, minute, 0).expect("marca da grade válida")
        })
        .collect()
}

/// Horários locais que contam como ocupados. Reservas canceladas liberam o
/// slot: nunca entram na lista.
pub fn occupied_times(reservations: &[Reservation]) -> Vec<NaiveTime> {
    reservations
        .iter()
        .filter(|r| r.status != ReservationStatus::Cancelled)
        .map(|r| r.local_date_time().time())
        .collect()
}

/// Ocupação binária: uma reserva viva no horário fecha o slot inteiro.
///
/// Horários fora da grade (ex.: 14:15) não casam com marca nenhuma e ficam
/// invisíveis para este modelo. Lacuna conhecida do modelo, preservada.
pub fn compute_slots(occupied: &[NaiveTime]) -> Vec<TimeSlot> {
    reference_grid()
        .into_iter()
        .map(|mark| TimeSlot {
            time: mark.format("%H:%M").to_string(),
            available: !occupied.contains(&mark),
        })
        .collect()
}

#[derive(Clone)]
pub struct AvailabilityService {
    reservation_repo: ReservationRepository,
}

impl AvailabilityService {
    pub fn new(reservation_repo: ReservationRepository) -> Self {
        Self { reservation_repo }
    }

    /// Slots reserváveis da franquia no dia civil pedido.
    pub async fn available_slots<'e, E>(
        &self,
        executor: E,
        franchise_display_name: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (window_start, window_end) = timezone::local_day_bounds(date);

        let reservations = self
            .reservation_repo
            .list_active_in_window(executor, franchise_display_name, window_start, window_end)
            .await?;

        Ok(compute_slots(&occupied_times(&reservations)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn reservation_at(hour: u32, minute: u32, status: ReservationStatus) -> Reservation {
        let local = NaiveDate::from_ymd_opt(2024, 6, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();

        Reservation {
            id: Uuid::new_v4(),
            franchise_name: "Central".to_string(),
            customer_name: "João Pereira".to_string(),
            phone: "+5511999990000".to_string(),
            date_time: timezone::local_to_utc(local),
            people: 2,
            birthday: false,
            birthday_person_name: None,
            characters: None,
            status,
            created_by: "public".to_string(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn grade_tem_24_marcas_de_10h_as_21h30() {
        let grid = reference_grid();
        assert_eq!(grid.len(), 24);
        assert_eq!(grid[0].format("%H:%M").to_string(), "10:00");
        assert_eq!(grid[1].format("%H:%M").to_string(), "10:30");
        assert_eq!(grid[23].format("%H:%M").to_string(), "21:30");
    }

    #[test]
    fn sem_reservas_tudo_disponivel() {
        let slots = compute_slots(&[]);
        assert_eq!(slots.len(), 24);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn reserva_viva_fecha_o_slot_correspondente() {
        let occupied = vec![NaiveTime::from_hms_opt(14, 0, 0).unwrap()];
        let slots = compute_slots(&occupied);

        let slot_14 = slots.iter().find(|s| s.time == "14:00").unwrap();
        assert!(!slot_14.available);
        assert_eq!(slots.iter().filter(|s| !s.available).count(), 1);
    }

    #[test]
    fn horario_fora_da_grade_nao_fecha_slot_nenhum() {
        let occupied = vec![NaiveTime::from_hms_opt(14, 15, 0).unwrap()];
        let slots = compute_slots(&occupied);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn reserva_cancelada_libera_o_slot() {
        let pending = reservation_at(14, 0, ReservationStatus::Pending);
        let slots = compute_slots(&occupied_times(&[pending]));
        assert!(!slots.iter().find(|s| s.time == "14:00").unwrap().available);

        // A mesma reserva, cancelada: o slot volta a ficar disponível.
        let cancelled = reservation_at(14, 0, ReservationStatus::Cancelled);
        let slots = compute_slots(&occupied_times(&[cancelled]));
        assert!(slots.iter().find(|s| s.time == "14:00").unwrap().available);
    }

    #[test]
    fn varias_reservas_fecham_varios_slots() {
        let occupied = vec![
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
        ];
        let slots = compute_slots(&occupied);
        assert!(!slots.first().unwrap().available);
        assert!(!slots.last().unwrap().available);
        assert_eq!(slots.iter().filter(|s| s.available).count(), 22);
    }
}
