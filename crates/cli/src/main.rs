use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use clinic_core::constants::{DEFAULT_SNAPSHOT_FILENAME, DEFAULT_SYSTEM_SENDER_ID};
use clinic_core::{
    Appointment, ClinicResult, ClinicService, CoreConfig, MedicalRecord, Message,
    MultiMediaContent, Patient,
};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic service CLI")]
struct Cli {
    /// Snapshot file to load before and save after a change
    #[arg(long, global = true, default_value = DEFAULT_SNAPSHOT_FILENAME)]
    snapshot: PathBuf,
    /// Sender id stamped on reminders
    #[arg(long, global = true, default_value_t = DEFAULT_SYSTEM_SENDER_ID)]
    system_sender_id: u64,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct MediaArgs {
    /// Image URL
    #[arg(long)]
    image_url: Option<String>,
    /// Audio URL
    #[arg(long)]
    audio_url: Option<String>,
    /// Video URL
    #[arg(long)]
    video_url: Option<String>,
}

impl MediaArgs {
    fn into_content(self) -> Option<MultiMediaContent> {
        Some(MultiMediaContent {
            image_url: self.image_url,
            audio_url: self.audio_url,
            video_url: self.video_url,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new patient
    RegisterPatient {
        name: String,
        contact_details: String,
        medical_history: String,
    },
    /// Show one patient
    GetPatient { id: u64 },
    /// Replace a patient's details
    UpdatePatient {
        id: u64,
        name: String,
        contact_details: String,
        medical_history: String,
    },
    /// Delete a patient
    DeletePatient { id: u64 },
    /// List all patients
    ListPatients,
    /// Schedule an appointment for an existing patient
    ScheduleAppointment {
        patient_id: u64,
        doctor_id: u64,
        /// Unix seconds or an RFC 3339 timestamp
        #[arg(value_parser = parse_date_time)]
        date_time: u64,
        reason: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Show one appointment
    GetAppointment { id: u64 },
    /// Replace an appointment's details
    UpdateAppointment {
        id: u64,
        patient_id: u64,
        doctor_id: u64,
        /// Unix seconds or an RFC 3339 timestamp
        #[arg(value_parser = parse_date_time)]
        date_time: u64,
        reason: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Delete an appointment
    DeleteAppointment { id: u64 },
    /// List all appointments
    ListAppointments,
    /// Send a message
    SendMessage {
        sender_id: u64,
        receiver_id: u64,
        content: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Send a reminder from the system sender to a patient
    SendReminder {
        patient_id: u64,
        content: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Show one message
    GetMessage { id: u64 },
    /// Replace a message's details
    UpdateMessage {
        id: u64,
        sender_id: u64,
        receiver_id: u64,
        content: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Delete a message
    DeleteMessage { id: u64 },
    /// List all messages
    ListMessages,
    /// Create a medical record for an existing patient
    CreateMedicalRecord {
        patient_id: u64,
        lab_results: String,
        treatment_history: String,
    },
    /// Show one medical record
    GetMedicalRecord { id: u64 },
    /// Replace a medical record's details
    UpdateMedicalRecord {
        id: u64,
        patient_id: u64,
        lab_results: String,
        treatment_history: String,
    },
    /// Delete a medical record
    DeleteMedicalRecord { id: u64 },
    /// List all medical records
    ListMedicalRecords,
}

impl Commands {
    fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Commands::GetPatient { .. }
                | Commands::ListPatients
                | Commands::GetAppointment { .. }
                | Commands::ListAppointments
                | Commands::GetMessage { .. }
                | Commands::ListMessages
                | Commands::GetMedicalRecord { .. }
                | Commands::ListMedicalRecords
        )
    }
}

/// Accepts Unix seconds or an RFC 3339 timestamp at or after the epoch.
fn parse_date_time(raw: &str) -> Result<u64, String> {
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(secs);
    }
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("expected Unix seconds or RFC 3339 timestamp: {e}"))?;
    u64::try_from(parsed.timestamp()).map_err(|_| "timestamp is before 1970".to_string())
}

fn format_date_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

fn format_media(media: &Option<MultiMediaContent>) -> String {
    let Some(media) = media else {
        return String::new();
    };
    let mut out = String::new();
    for (label, url) in [
        ("image", &media.image_url),
        ("audio", &media.audio_url),
        ("video", &media.video_url),
    ] {
        if let Some(url) = url {
            out.push_str(&format!(", {label}: {url}"));
        }
    }
    out
}

fn patient_line(p: &Patient) -> String {
    format!(
        "Patient ID: {}, Name: {}, Contact: {}, History: {}",
        p.id, p.name, p.contact_details, p.medical_history
    )
}

fn appointment_line(a: &Appointment) -> String {
    format!(
        "Appointment ID: {}, Patient: {}, Doctor: {}, When: {}, Reason: {}{}",
        a.id,
        a.patient_id,
        a.doctor_id,
        format_date_time(a.date_time),
        a.reason,
        format_media(&a.multimedia_content)
    )
}

fn message_line(m: &Message) -> String {
    format!(
        "Message ID: {}, From: {}, To: {}, Content: {}{}",
        m.id,
        m.sender_id,
        m.receiver_id,
        m.content,
        format_media(&m.multimedia_content)
    )
}

fn medical_record_line(r: &MedicalRecord) -> String {
    format!(
        "Medical record ID: {}, Patient: {}, Lab results: {}, Treatment: {}",
        r.id, r.patient_id, r.lab_results, r.treatment_history
    )
}

fn list_lines<T>(items: &[T], empty: &str, line: fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

/// Runs one command against `service` and returns the text to print.
fn execute(service: &ClinicService, command: Commands) -> ClinicResult<String> {
    let out = match command {
        Commands::RegisterPatient {
            name,
            contact_details,
            medical_history,
        } => patient_line(&service.register_patient(name, contact_details, medical_history)?),
        Commands::GetPatient { id } => patient_line(&service.get_patient(id)?),
        Commands::UpdatePatient {
            id,
            name,
            contact_details,
            medical_history,
        } => patient_line(&service.update_patient(id, name, contact_details, medical_history)?),
        Commands::DeletePatient { id } => {
            service.delete_patient(id)?;
            format!("Deleted patient {id}")
        }
        Commands::ListPatients => {
            list_lines(&service.list_patients(), "No patients found.", patient_line)
        }
        Commands::ScheduleAppointment {
            patient_id,
            doctor_id,
            date_time,
            reason,
            media,
        } => appointment_line(&service.schedule_appointment(
            patient_id,
            doctor_id,
            date_time,
            reason,
            media.into_content(),
        )?),
        Commands::GetAppointment { id } => appointment_line(&service.get_appointment(id)?),
        Commands::UpdateAppointment {
            id,
            patient_id,
            doctor_id,
            date_time,
            reason,
            media,
        } => appointment_line(&service.update_appointment(
            id,
            patient_id,
            doctor_id,
            date_time,
            reason,
            media.into_content(),
        )?),
        Commands::DeleteAppointment { id } => {
            service.delete_appointment(id)?;
            format!("Deleted appointment {id}")
        }
        Commands::ListAppointments => list_lines(
            &service.list_appointments(),
            "No appointments found.",
            appointment_line,
        ),
        Commands::SendMessage {
            sender_id,
            receiver_id,
            content,
            media,
        } => message_line(&service.send_message(
            sender_id,
            receiver_id,
            content,
            media.into_content(),
        )?),
        Commands::SendReminder {
            patient_id,
            content,
            media,
        } => message_line(&service.send_reminder_to_patient(
            patient_id,
            content,
            media.into_content(),
        )?),
        Commands::GetMessage { id } => message_line(&service.get_message(id)?),
        Commands::UpdateMessage {
            id,
            sender_id,
            receiver_id,
            content,
            media,
        } => message_line(&service.update_message(
            id,
            sender_id,
            receiver_id,
            content,
            media.into_content(),
        )?),
        Commands::DeleteMessage { id } => {
            service.delete_message(id)?;
            format!("Deleted message {id}")
        }
        Commands::ListMessages => {
            list_lines(&service.list_messages(), "No messages found.", message_line)
        }
        Commands::CreateMedicalRecord {
            patient_id,
            lab_results,
            treatment_history,
        } => medical_record_line(&service.create_medical_record(
            patient_id,
            lab_results,
            treatment_history,
        )?),
        Commands::GetMedicalRecord { id } => medical_record_line(&service.get_medical_record(id)?),
        Commands::UpdateMedicalRecord {
            id,
            patient_id,
            lab_results,
            treatment_history,
        } => medical_record_line(&service.update_medical_record(
            id,
            patient_id,
            lab_results,
            treatment_history,
        )?),
        Commands::DeleteMedicalRecord { id } => {
            service.delete_medical_record(id)?;
            format!("Deleted medical record {id}")
        }
        Commands::ListMedicalRecords => list_lines(
            &service.list_medical_records(),
            "No medical records found.",
            medical_record_line,
        ),
    };
    Ok(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(CoreConfig::new(Some(cli.snapshot.clone()), cli.system_sender_id)?);
    let service = ClinicService::load(cfg)?;
    let mutation = command.is_mutation();

    match execute(&service, command) {
        Ok(out) => {
            println!("{out}");
            if mutation {
                service.save_snapshot(&cli.snapshot)?;
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(service: &ClinicService, args: &[&str]) -> ClinicResult<String> {
        let cli = Cli::try_parse_from(std::iter::once("clinic").chain(args.iter().copied()))
            .expect("arguments should parse");
        execute(service, cli.command.expect("a subcommand"))
    }

    #[test]
    fn test_parse_date_time_accepts_seconds_and_rfc3339() {
        assert_eq!(parse_date_time("1700000000").unwrap(), 1_700_000_000);
        assert_eq!(
            parse_date_time("2023-11-14T22:13:20Z").unwrap(),
            1_700_000_000
        );
        assert!(parse_date_time("1969-12-31T23:59:59Z").is_err());
        assert!(parse_date_time("next tuesday").is_err());
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_date_time(1_700_000_000), "2023-11-14T22:13:20+00:00");
        assert_eq!(format_date_time(u64::MAX), u64::MAX.to_string());
    }

    #[test]
    fn test_register_schedule_and_list() {
        let svc = ClinicService::default();

        let out = run(&svc, &["register-patient", "Alice", "555-0100", "none"]).unwrap();
        assert_eq!(
            out,
            "Patient ID: 1, Name: Alice, Contact: 555-0100, History: none"
        );

        let out = run(
            &svc,
            &[
                "schedule-appointment",
                "1",
                "99",
                "2023-11-14T22:13:20Z",
                "checkup",
                "--image-url",
                "https://img.example/a.png",
            ],
        )
        .unwrap();
        assert!(out.starts_with("Appointment ID: 1, Patient: 1, Doctor: 99"));
        assert!(out.ends_with("image: https://img.example/a.png"));

        let out = run(&svc, &["list-appointments"]).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_errors_are_returned() {
        let svc = ClinicService::default();
        assert!(run(&svc, &["get-patient", "3"]).is_err());
        assert!(run(&svc, &["send-reminder", "3", "hello"]).is_err());
        assert_eq!(
            run(&svc, &["list-messages"]).unwrap(),
            "No messages found."
        );
    }

    #[test]
    fn test_non_numeric_id_fails_to_parse() {
        assert!(Cli::try_parse_from(["clinic", "get-patient", "abc"]).is_err());
    }

    #[test]
    fn test_reads_are_not_mutations() {
        let cli = Cli::try_parse_from(["clinic", "list-patients"]).unwrap();
        assert!(!cli.command.unwrap().is_mutation());
        let cli = Cli::try_parse_from(["clinic", "delete-message", "1"]).unwrap();
        assert!(cli.command.unwrap().is_mutation());
    }

    #[test]
    fn test_snapshot_round_trip_between_invocations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        let cfg = || Arc::new(CoreConfig::new(Some(path.clone()), 0).unwrap());

        let first = ClinicService::load(cfg()).unwrap();
        run(&first, &["register-patient", "Alice", "555-0100", "none"]).unwrap();
        first.save_snapshot(&path).unwrap();

        let second = ClinicService::load(cfg()).unwrap();
        let out = run(&second, &["create-medical-record", "1", "Hb 13", "none"]).unwrap();
        assert_eq!(
            out,
            "Medical record ID: 1, Patient: 1, Lab results: Hb 13, Treatment: none"
        );
    }
}
