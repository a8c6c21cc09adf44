use crate::dto::AttendanceDto;
use crate::model::Attendance;

pub struct AttendanceMapper;

impl AttendanceMapper {
    /// Optional fields are carried over only when the endpoint sent them.
    pub fn from_api(dto: AttendanceDto) -> Attendance {
        Attendance {
            id: dto.id,
            fecha: dto.fecha,
            estado: dto.estado,
            estudiante: dto.estudiante,
            grado: dto.grado,
            justificativos: dto.justificativos,
            porcentaje_asistencia: dto.porcentaje_asistencia,
            nombre_estudiante: dto.nombre_estudiante,
        }
    }

    /// `justificativos` is always written: missing, null and empty text all
    /// become an explicit JSON null.
    pub fn to_api(domain: &Attendance) -> AttendanceDto {
        let justificativos = domain
            .justificacion()
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        AttendanceDto {
            id: domain.id,
            fecha: domain.fecha,
            estado: domain.estado,
            estudiante: domain.estudiante,
            grado: domain.grado,
            justificativos: Some(justificativos),
            porcentaje_asistencia: domain.porcentaje_asistencia,
            nombre_estudiante: domain.nombre_estudiante.clone(),
        }
    }
}
