use crate::dto::{UserDto, UserWriteDto};
use crate::model::User;

pub struct UserMapper;

impl UserMapper {
    pub fn from_api(dto: UserDto) -> User {
        User {
            id: dto.id,
            nombre: dto.nombre,
            apellido: dto.apellido,
            email: dto.email,
            rol: dto.rol,
            activo: dto.activo,
            dni: dto.dni,
            tipo_documento: dto.tipo_documento,
            telefono: dto.telefono,
            institucion: dto.institucion,
        }
    }

    /// Role and activation are managed elsewhere and never leave through
    /// this path.
    pub fn to_api(domain: &User) -> UserWriteDto {
        UserWriteDto {
            id: domain.id,
            nombre: domain.nombre.clone(),
            apellido: domain.apellido.clone(),
            email: domain.email.clone(),
            dni: domain.dni.clone(),
            tipo_documento: domain.tipo_documento.clone(),
            telefono: domain.telefono.clone(),
            institucion: domain.institucion.clone(),
        }
    }
}
