// src/common/timezone.rs

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

// America/Sao_Paulo não tem horário de verão desde 2019: o offset é fixo.
const BRT_OFFSET_SECONDS: i32 = -3 * 3600;

/// O fuso civil em que as reservas são digitadas e exibidas.
pub fn business_offset() -> FixedOffset {
    // Constante conhecida: -03:00 está sempre dentro do intervalo válido.
    FixedOffset::east_opt(BRT_OFFSET_SECONDS).expect("offset fixo válido")
}

/// Converte a hora civil (parede) da franquia para o instante UTC armazenado.
///
/// Com offset fixo a conversão é sempre unívoca, então a volta por
/// `utc_to_local` reproduz exatamente os campos de relógio originais.
pub fn local_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    match business_offset().from_local_datetime(&local) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // Offset fixo não tem lacunas nem ambiguidades.
        _ => Utc.from_utc_datetime(&local),
    }
}

/// Converte o instante UTC armazenado de volta para a hora civil.
pub fn utc_to_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&business_offset()).naive_local()
}

/// Janela UTC `[início, fim)` correspondente ao dia civil `date` na franquia.
pub fn local_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_to_utc(date.and_hms_opt(0, 0, 0).expect("meia-noite válida"));
    (start, start + chrono::Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn round_trip_preserva_hora_civil() {
        let local = NaiveDate::from_ymd_opt(2024, 6, 25)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();

        let utc = local_to_utc(local);
        assert_eq!(utc_to_local(utc), local);
        // 19:00 -03:00 == 22:00 UTC
        assert_eq!(utc.format("%Y-%m-%dT%H:%M").to_string(), "2024-06-25T22:00");
    }

    #[test]
    fn janela_do_dia_civil_cobre_24h() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 25).unwrap();
        let (start, end) = local_day_bounds(date);

        assert_eq!(end - start, chrono::Duration::days(1));
        // Meia-noite local é 03:00 UTC do mesmo dia.
        assert_eq!(start.format("%H:%M").to_string(), "03:00");
        assert_eq!(utc_to_local(start).format("%H:%M").to_string(), "00:00");
    }
}
