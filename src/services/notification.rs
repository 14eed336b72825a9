// src/services/notification.rs

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::models::reservation::Reservation;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Entrega novas reservas ao webhook da franquia.
///
/// Fire-and-forget: falha é logada e nunca retentada nem devolvida ao
/// cliente que fez a reserva.
#[derive(Clone)]
pub struct NotificationDispatcher {
    client: Client,
}

impl NotificationDispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// O envelope JSON que o fluxo de automação da franquia espera.
    pub fn build_envelope(reservation: &Reservation) -> Value {
        let local = reservation.local_date_time();
        let formatted_date = local.format("%d/%m/%Y").to_string();
        let formatted_time = local.format("%H:%M").to_string();

        let message = format!(
            "Nova reserva em {}: {} para {} pessoa(s) em {} às {}.",
            reservation.franchise_name,
            reservation.customer_name,
            reservation.people,
            formatted_date,
            formatted_time,
        );

        json!({
            "type": "new_reservation",
            "reservation": reservation,
            "message": message,
            "formatted_date": formatted_date,
            "formatted_time": formatted_time,
            "timestamp": Utc::now().to_rfc3339(),
        })
    }

    /// Dispara a notificação. Chamado de uma task separada pelo ciclo de
    /// vida de reservas; o retorno existe só para o log do chamador.
    pub async fn notify_new_reservation(
        &self,
        webhook_url: &str,
        reservation: &Reservation,
    ) -> Result<(), reqwest::Error> {
        let envelope = Self::build_envelope(reservation);

        let response = self
            .client
            .post(webhook_url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&envelope)
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }

    /// Envia uma mensagem de chat ao webhook de mensagens da franquia.
    pub async fn send_chat_message(
        &self,
        webhook_url: &str,
        payload: &Value,
    ) -> Result<(), reqwest::Error> {
        let response = self
            .client
            .post(webhook_url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(payload)
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::timezone;
    use crate::models::reservation::ReservationStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn sample_reservation() -> Reservation {
        let local = NaiveDate::from_ymd_opt(2024, 6, 25)
            .unwrap()
            .and_hms_opt(19, 0, 0)
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
            status: ReservationStatus::Pending,
            created_by: "public".to_string(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn envelope_tem_os_campos_do_contrato() {
        let envelope = NotificationDispatcher::build_envelope(&sample_reservation());

        assert_eq!(envelope["type"], "new_reservation");
        assert_eq!(envelope["formatted_date"], "25/06/2024");
        assert_eq!(envelope["formatted_time"], "19:00");
        assert!(envelope["message"].as_str().unwrap().contains("Central"));
        assert!(envelope["reservation"]["customerName"].is_string());
        assert!(envelope["timestamp"].is_string());
    }

    #[test]
    fn datas_formatadas_usam_a_hora_civil_nao_a_utc() {
        // 23:30 local cruza a meia-noite em UTC; o envelope deve mostrar o
        // dia civil da franquia.
        let local = NaiveDate::from_ymd_opt(2024, 6, 25)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let mut reservation = sample_reservation();
        reservation.date_time = timezone::local_to_utc(local);

        let envelope = NotificationDispatcher::build_envelope(&reservation);
        assert_eq!(envelope["formatted_date"], "25/06/2024");
        assert_eq!(envelope["formatted_time"], "23:30");
    }
}
